//! Property-based checks shared by every classifier.

use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

use nids::training::{accuracy, f1_score, Average};
use nids::{
    BoostedConfig, BoostedEnsemble, Classifier, Dataset, FeedForwardNetwork, ForestConfig,
    KnnConfig, MinMaxNormalizer, MlpConfig, NearestNeighbor, RandomForest, Sample,
};

// =============================================================================
// Strategies
// =============================================================================

/// Labeled rows with 1..4 finite features and labels drawn from a small set.
fn arb_dataset(min_rows: usize) -> impl Strategy<Value = Dataset> {
    (1usize..4).prop_flat_map(move |n_features| {
        prop_vec(
            (prop_vec(-100.0f64..100.0, n_features), 0u32..4),
            min_rows..30,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(features, label)| Sample::new(features, label))
                .collect::<Dataset>()
        })
    })
}

fn small_classifiers() -> Vec<Box<dyn Classifier>> {
    vec![
        Box::new(NearestNeighbor::new(KnnConfig::builder().k(1).build().unwrap())),
        Box::new(RandomForest::new(ForestConfig::builder().n_trees(3).build().unwrap())),
        Box::new(BoostedEnsemble::new(BoostedConfig::builder().rounds(2).build().unwrap())),
        Box::new(FeedForwardNetwork::new(
            MlpConfig::builder()
                .hidden_layers(vec![4])
                .max_iterations(3)
                .build()
                .unwrap(),
        )),
    ]
}

fn has_two_labels(data: &Dataset) -> bool {
    let mut labels = data.labels().flatten();
    labels
        .next()
        .is_some_and(|first| labels.any(|label| label != first))
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn one_prediction_per_sample_from_training_labels(data in arb_dataset(2)) {
        prop_assume!(has_two_labels(&data));
        let seen: Vec<u32> = data.labels().flatten().collect();

        for mut model in small_classifiers() {
            model.train(&data).unwrap();
            let predicted = model.predict(&data).unwrap();
            prop_assert_eq!(predicted.len(), data.len());
            prop_assert!(predicted.iter().all(|label| seen.contains(label)));
            prop_assert_eq!(model.predict(&data).unwrap(), predicted);
        }
    }

    #[test]
    fn nearest_neighbor_recalls_distinct_training_points(data in arb_dataset(1)) {
        let mut points: Vec<&Vec<f64>> = data.iter().map(|s| &s.features).collect();
        points.sort_by(|a, b| a.partial_cmp(b).unwrap());
        points.dedup();
        prop_assume!(points.len() == data.len());

        let mut knn = NearestNeighbor::new(KnnConfig::builder().k(1).build().unwrap());
        knn.train(&data).unwrap();
        let truth: Vec<u32> = data.labels().flatten().collect();
        prop_assert_eq!(knn.predict(&data).unwrap(), truth);
    }

    #[test]
    fn normalized_training_data_lies_in_range(data in arb_dataset(1)) {
        let mut normalizer = MinMaxNormalizer::new(-1.0, 1.0).unwrap();
        let scaled = normalizer.fit_transform(&data).unwrap();
        prop_assert_eq!(scaled.len(), data.len());
        for sample in &scaled {
            prop_assert!(sample.features.iter().all(|v| (-1.0 - 1e-9..=1.0 + 1e-9).contains(v)));
        }
    }

    #[test]
    fn metrics_are_bounded(pairs in prop_vec((0u32..5, 0u32..5), 1..50)) {
        let (truth, predicted): (Vec<u32>, Vec<u32>) = pairs.into_iter().unzip();
        let acc = accuracy(&truth, &predicted).unwrap();
        prop_assert!((0.0..=1.0).contains(&acc));
        for average in [Average::Macro, Average::Weighted] {
            let f1 = f1_score(&truth, &predicted, average).unwrap();
            prop_assert!((0.0..=1.0 + 1e-12).contains(&f1));
        }
        prop_assert_eq!(accuracy(&truth, &truth).unwrap(), 1.0);
    }
}
