//! Greedy depth-first tree grower shared by the forest and the boosted ensemble.

use ndarray::ArrayView2;
use rand::Rng;

use super::sampling::sample_features;
use super::split::SplitCriterion;
use crate::error::ConfigError;
use crate::repr::{MutableTree, NodeId, Tree, TreeValidationError};

/// Shape limits of a grown tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    /// Deepest level that may still split; the root is level 1, so children
    /// of a node at this depth are always leaves.
    pub max_depth: u32,
    /// A non-root node with at most this many samples becomes a leaf.
    pub min_size: usize,
}

impl TreeParams {
    pub const fn new(max_depth: u32, min_size: usize) -> Self {
        Self {
            max_depth,
            min_size,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth);
        }
        Ok(())
    }
}

/// Grows one tree over a row subset.
///
/// Nodes are expanded depth-first, left subtree before right, with an
/// explicit stack. Each expanded node draws its own candidate features from
/// the RNG, so the draw order equals that of a recursive grower.
#[derive(Debug, Clone, Copy)]
pub struct TreeGrower {
    params: TreeParams,
    n_candidates: usize,
}

impl TreeGrower {
    /// Grower evaluating `n_candidates` random features per node.
    pub fn new(params: TreeParams, n_candidates: usize) -> Self {
        Self {
            params,
            n_candidates,
        }
    }

    /// Grow a tree over `rows` of `x` (rows may repeat, e.g. a bootstrap).
    pub fn grow<C, R>(
        &self,
        x: ArrayView2<'_, f64>,
        rows: Vec<usize>,
        criterion: &C,
        rng: &mut R,
    ) -> Result<Tree<C::Leaf>, TreeValidationError>
    where
        C: SplitCriterion,
        R: Rng,
    {
        let n_features = x.ncols();
        let mut tree = MutableTree::new();
        let mut stack: Vec<(NodeId, Vec<usize>, u32)> = vec![(tree.root(), rows, 1)];

        while let Some((node, rows, depth)) = stack.pop() {
            if !self.is_terminal(rows.len(), depth) {
                let candidates = sample_features(n_features, self.n_candidates, rng);
                if let Some(split) = criterion.find_split(x, &rows, &candidates) {
                    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                        .iter()
                        .partition(|&&r| x[[r, split.feature]] <= split.threshold);
                    let (left, right) = tree.set_split(node, split.feature, split.threshold);
                    stack.push((right, right_rows, depth + 1));
                    stack.push((left, left_rows, depth + 1));
                    continue;
                }
            }
            tree.make_leaf(node, criterion.leaf(&rows));
        }

        tree.freeze()
    }

    #[inline]
    fn is_terminal(&self, n_rows: usize, depth: u32) -> bool {
        n_rows == 0
            || depth > self.params.max_depth
            || (depth > 1 && n_rows <= self.params.min_size)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array2};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    use super::*;
    use crate::data::LabelSet;
    use crate::repr::{ClassLeaf, Node, ScalarLeaf};
    use crate::training::split::{GainCriterion, GainParams, GiniCriterion};

    fn rng() -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(42)
    }

    #[test]
    fn zero_max_depth_is_rejected() {
        let params = TreeParams {
            max_depth: 0,
            min_size: 1,
        };
        assert_eq!(params.validate(), Err(ConfigError::InvalidMaxDepth));
    }

    #[test]
    fn depth_one_tree_is_a_stump() {
        // Three classes along one axis: a stump cannot separate all of them.
        let x = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0]];
        let classes = [0, 0, 1, 1, 2, 2];
        let labels = LabelSet::from_labels([0, 1, 2]);
        let criterion = GiniCriterion::new(&classes, &labels);
        let params = TreeParams {
            max_depth: 1,
            min_size: 1,
        };

        let tree = TreeGrower::new(params, 1)
            .grow(x.view(), (0..6).collect(), &criterion, &mut rng())
            .unwrap();
        assert_eq!(tree.n_nodes(), 3);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn deeper_tree_separates_three_classes() {
        let x = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0]];
        let classes = [0, 0, 1, 1, 2, 2];
        let labels = LabelSet::from_labels([10, 20, 30]);
        let criterion = GiniCriterion::new(&classes, &labels);
        let params = TreeParams {
            max_depth: 3,
            min_size: 1,
        };

        let tree = TreeGrower::new(params, 1)
            .grow(x.view(), (0..6).collect(), &criterion, &mut rng())
            .unwrap();
        for (row, expected) in [(0.0, 10), (1.0, 10), (2.5, 20), (4.5, 30)] {
            assert_eq!(tree.predict_row(&[row]), &ClassLeaf(expected));
        }
    }

    #[test]
    fn min_size_stops_small_children() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let grads = [-1.0, 1.0, -1.0, 1.0];
        let hess = [0.25; 4];
        let criterion = GainCriterion::new(
            &grads,
            &hess,
            GainParams {
                lambda: 1.0,
                gamma: 0.0,
            },
        );
        let params = TreeParams {
            max_depth: 10,
            min_size: 4,
        };

        let tree = TreeGrower::new(params, 1)
            .grow(x.view(), (0..4).collect(), &criterion, &mut rng())
            .unwrap();
        // Root splits; both children have <= 4 samples.
        assert!(matches!(tree.node(0), Node::Split { .. }));
        assert_eq!(tree.n_leaves(), 2);
    }

    #[test]
    fn single_sample_root_is_a_leaf() {
        let x: Array2<f64> = array![[3.0, 4.0]];
        let grads = [0.5];
        let hess = [0.25];
        let criterion = GainCriterion::new(
            &grads,
            &hess,
            GainParams {
                lambda: 1.0,
                gamma: 0.0,
            },
        );
        let params = TreeParams {
            max_depth: 3,
            min_size: 1,
        };
        let tree = TreeGrower::new(params, 2)
            .grow(x.view(), vec![0], &criterion, &mut rng())
            .unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict_row(&[0.0, 0.0]), &ScalarLeaf(-0.5 / 1.25));
    }
}
