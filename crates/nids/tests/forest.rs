//! Random forest training and voting.

use std::num::NonZeroUsize;

use nids::repr::{ClassLeaf, Node};
use nids::testing::data::{jittered_clusters, separable_binary};
use nids::{Classifier, Dataset, ForestConfig, RandomForest, TreeParams};
use rstest::rstest;

fn three_clusters() -> Dataset {
    jittered_clusters(
        &[
            (10, vec![0.0, 0.0, 0.0, 0.0]),
            (20, vec![5.0, 5.0, 5.0, 5.0]),
            (30, vec![10.0, 0.0, 10.0, 0.0]),
        ],
        30,
        0.5,
        3,
    )
}

#[test]
fn single_label_trees_are_leaves() {
    let data = Dataset::from_rows((0..20).map(|i| vec![i as f64, -(i as f64)]).collect(), vec![6; 20]).unwrap();
    let mut forest = RandomForest::new(ForestConfig::builder().n_trees(4).sample_ratio(1.0).build().unwrap());
    forest.train(&data).unwrap();

    assert_eq!(forest.trees().len(), 4);
    for tree in forest.trees() {
        assert_eq!(tree.nodes(), &[Node::Leaf(ClassLeaf(6))]);
    }
    assert!(forest.predict(&data).unwrap().iter().all(|&label| label == 6));
}

#[rstest]
#[case(1, 1)]
#[case(2, 3)]
#[case(4, 15)]
fn tree_size_is_bounded_by_depth(#[case] max_depth: u32, #[case] max_internal: usize) {
    let mut forest = RandomForest::new(
        ForestConfig::builder()
            .n_trees(6)
            .tree(TreeParams::new(max_depth, 1))
            .sample_ratio(1.0)
            .build()
            .unwrap(),
    );
    forest.train(&three_clusters()).unwrap();
    for tree in forest.trees() {
        let internal = tree.n_nodes() - tree.n_leaves();
        assert!(internal <= max_internal, "{internal} splits at depth {max_depth}");
        assert!(tree.depth() <= max_depth as usize + 1);
    }
}

#[test]
fn leaves_hold_training_labels() {
    let mut forest = RandomForest::new(ForestConfig::builder().n_trees(8).build().unwrap());
    forest.train(&three_clusters()).unwrap();
    for tree in forest.trees() {
        for node in tree.nodes() {
            if let Node::Leaf(ClassLeaf(label)) = node {
                assert!([10, 20, 30].contains(label));
            }
        }
    }
}

#[test]
fn same_seed_same_forest() {
    let data = three_clusters();
    let config = ForestConfig::builder().n_trees(10).seed(7).build().unwrap();
    let mut a = RandomForest::new(config.clone());
    let mut b = RandomForest::new(config);
    a.train(&data).unwrap();
    b.train(&data).unwrap();
    assert_eq!(a.trees(), b.trees());
}

#[test]
fn different_seeds_draw_different_bootstraps() {
    let data = three_clusters();
    let mut a = RandomForest::new(ForestConfig::builder().n_trees(10).seed(1).build().unwrap());
    let mut b = RandomForest::new(ForestConfig::builder().n_trees(10).seed(2).build().unwrap());
    a.train(&data).unwrap();
    b.train(&data).unwrap();
    assert_ne!(a.trees(), b.trees());
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(8)]
fn predictions_do_not_depend_on_thread_count(#[case] n_threads: usize) {
    let data = separable_binary(60, 6, 4);
    let reference = {
        let mut forest = RandomForest::new(ForestConfig::builder().n_trees(9).build().unwrap());
        forest.train(&data).unwrap();
        forest.predict(&data).unwrap()
    };

    let mut forest = RandomForest::new(
        ForestConfig::builder()
            .n_trees(9)
            .n_threads(NonZeroUsize::new(n_threads).unwrap())
            .build()
            .unwrap(),
    );
    forest.train(&data).unwrap();
    assert_eq!(forest.predict(&data).unwrap(), reference);
}

#[test]
fn separated_clusters_are_learned() {
    let mut forest = RandomForest::new(
        ForestConfig::builder()
            .n_trees(15)
            .tree(TreeParams::new(4, 1))
            .sample_ratio(1.0)
            .build()
            .unwrap(),
    );
    forest.train(&three_clusters()).unwrap();

    // Points well inside each cluster.
    let test = jittered_clusters(
        &[
            (10, vec![0.0, 0.0, 0.0, 0.0]),
            (20, vec![5.0, 5.0, 5.0, 5.0]),
            (30, vec![10.0, 0.0, 10.0, 0.0]),
        ],
        10,
        0.2,
        77,
    );
    let truth: Vec<u32> = test.labels().map(Option::unwrap).collect();
    assert_eq!(forest.predict(&test).unwrap(), truth);
}
