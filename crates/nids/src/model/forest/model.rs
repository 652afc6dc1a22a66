//! Random forest model.

use ndarray::ArrayView2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::ForestConfig;
use crate::data::{Dataset, LabelSet, TrainingData};
use crate::error::ClassifierError;
use crate::model::Classifier;
use crate::repr::{ClassLeaf, Tree, TreeValidationError};
use crate::training::sampling::{bootstrap, bootstrap_size, mix_seed, sqrt_features};
use crate::training::{GiniCriterion, TrainingLogger, TreeGrower};
use crate::utils::{majority_vote, run_with_threads, Parallelism};

/// Bagging ensemble of Gini decision trees.
///
/// Every tree is grown on its own bootstrap sample with `floor(sqrt(d))`
/// random candidate features per node, and predicts a label directly.
/// The forest predicts the most common tree vote.
#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    state: Option<Trained>,
}

#[derive(Debug, Clone)]
struct Trained {
    trees: Vec<Tree<ClassLeaf>>,
    n_features: usize,
    label_set: LabelSet,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Trained trees in construction order; empty before training.
    pub fn trees(&self) -> &[Tree<ClassLeaf>] {
        self.state
            .as_ref()
            .map(|s| s.trees.as_slice())
            .unwrap_or_default()
    }

    // =========================================================================
    // Training
    // =========================================================================

    fn grow_trees(
        &self,
        data: &TrainingData,
        parallelism: Parallelism,
    ) -> Result<Vec<Tree<ClassLeaf>>, TreeValidationError> {
        let x = data.features.view();
        let n_rows = data.n_samples();
        let grower = TreeGrower::new(self.config.tree, sqrt_features(data.n_features()));
        let criterion = GiniCriterion::new(&data.classes, &data.label_set);

        parallelism.maybe_par_try_map(0..self.config.n_trees as u64, |index| {
            let (rows, mut rng) = self.bootstrap_rows(n_rows, index);
            grower.grow(x, rows, &criterion, &mut rng)
        })
    }

    /// Bootstrap rows of tree `index`, and the RNG positioned to grow it.
    fn bootstrap_rows(&self, n_rows: usize, index: u64) -> (Vec<usize>, Xoshiro256PlusPlus) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(mix_seed(self.config.seed, index));
        let size = bootstrap_size(n_rows, self.config.sample_ratio);
        (bootstrap(n_rows, size, &mut rng), rng)
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    fn vote(trees: &[Tree<ClassLeaf>], x: ArrayView2<'_, f64>, row: usize) -> Option<u32> {
        let sample = x.row(row);
        majority_vote(trees.iter().map(|tree| tree.predict_row(&sample).0))
    }
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(ForestConfig::default())
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &'static str {
        "random_forest"
    }

    fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    fn train(&mut self, training_set: &Dataset) -> Result<(), ClassifierError> {
        self.state = None;
        let data = training_set.to_training_data()?;
        let logger = TrainingLogger::new(self.name(), self.config.verbosity);
        logger.start_training(data.n_samples(), data.n_features(), data.n_classes());

        let trees = run_with_threads(self.config.n_threads, |parallelism| {
            self.grow_trees(&data, parallelism)
        })?;

        let collapsed = trees.iter().filter(|t| t.n_nodes() == 1).count();
        if collapsed > 0 && data.n_classes() > 1 {
            logger.warn(&format!(
                "{collapsed} of {} trees collapsed to a single leaf",
                trees.len()
            ));
        }
        for (index, tree) in trees.iter().enumerate() {
            logger.log_metrics(
                index,
                &[
                    ("nodes", tree.n_nodes() as f64),
                    ("depth", tree.depth() as f64),
                ],
            );
        }
        logger.finish_training(&format!("{} trees", trees.len()));

        self.state = Some(Trained {
            trees,
            n_features: data.n_features(),
            label_set: data.label_set,
        });
        Ok(())
    }

    fn predict(&self, test_set: &Dataset) -> Result<Vec<u32>, ClassifierError> {
        let state = self.state.as_ref().ok_or(ClassifierError::ModelNotTrained)?;
        let x = test_set.to_prediction_matrix(state.n_features, &state.label_set)?;
        if x.nrows() == 0 {
            return Ok(Vec::new());
        }

        let votes = run_with_threads(self.config.n_threads, |parallelism| {
            parallelism.maybe_par_map(0..x.nrows(), |row| Self::vote(&state.trees, x.view(), row))
        });
        votes
            .into_iter()
            .collect::<Option<Vec<u32>>>()
            .ok_or(ClassifierError::EmptyEnsemble)
    }
}
