//! Boosted ensemble model.

use ndarray::ArrayView1;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::{BoostedConfig, DecisionThreshold};
use crate::data::{Dataset, LabelSet, TrainingData};
use crate::error::{ClassifierError, DataError};
use crate::model::Classifier;
use crate::repr::network::{sigmoid, softmax_inplace};
use crate::repr::{ScalarLeaf, Tree};
use crate::training::sampling::ratio_features;
use crate::training::{
    GainCriterion, Gradients, LogisticLoss, ObjectiveFn, SoftmaxLoss, TrainingLogger, TreeGrower,
};
use crate::utils::{argmax, run_with_threads};

/// Gradient-boosted regression trees.
///
/// Two classes are boosted on the logistic loss with one tree per round;
/// more than two on the softmax loss with one tree per class per round.
/// A training set with a single label produces a constant predictor.
#[derive(Debug, Clone)]
pub struct BoostedEnsemble {
    config: BoostedConfig,
    state: Option<Trained>,
}

#[derive(Debug, Clone)]
struct Trained {
    ensemble: Ensemble,
    n_features: usize,
    label_set: LabelSet,
}

#[derive(Debug, Clone)]
enum Ensemble {
    Constant(u32),
    Binary(Vec<Tree<ScalarLeaf>>),
    /// Tree `i` adds to the score of class `i % n_classes`.
    Multiclass {
        n_classes: usize,
        trees: Vec<Tree<ScalarLeaf>>,
    },
}

impl BoostedEnsemble {
    pub fn new(config: BoostedConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &BoostedConfig {
        &self.config
    }

    /// Trained trees in boosting order; empty before training and for a
    /// constant predictor.
    pub fn trees(&self) -> &[Tree<ScalarLeaf>] {
        match self.state.as_ref().map(|s| &s.ensemble) {
            Some(Ensemble::Binary(trees)) | Some(Ensemble::Multiclass { trees, .. }) => trees,
            Some(Ensemble::Constant(_)) | None => &[],
        }
    }

    // =========================================================================
    // Training
    // =========================================================================

    fn boost<O: ObjectiveFn>(
        &self,
        data: &TrainingData,
        objective: &O,
        logger: &TrainingLogger,
    ) -> Result<Vec<Tree<ScalarLeaf>>, ClassifierError> {
        let x = data.features.view();
        let n_samples = data.n_samples();
        let n_outputs = objective.n_outputs();
        let learning_rate = self.config.learning_rate;
        let grower = TreeGrower::new(
            self.config.tree,
            ratio_features(data.n_features(), self.config.feature_ratio),
        );
        let gain = self.config.gain_params();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.seed);

        // Column-major: scores[output * n_samples + sample]
        let mut scores = vec![objective.base_score(); n_samples * n_outputs];
        let mut grads = Gradients::new(n_samples, n_outputs);
        let mut trees = Vec::with_capacity(self.config.rounds as usize * n_outputs);

        for round in 0..self.config.rounds as usize {
            objective.compute_gradients(&scores, &data.classes, &mut grads);

            let mut round_trees = Vec::with_capacity(n_outputs);
            for output in 0..n_outputs {
                let criterion =
                    GainCriterion::new(grads.output_grads(output), grads.output_hess(output), gain);
                let rows = (0..n_samples).collect();
                round_trees.push(grower.grow(x, rows, &criterion, &mut rng)?);
            }

            for (tree, output_scores) in round_trees.iter().zip(scores.chunks_mut(n_samples)) {
                for (i, score) in output_scores.iter_mut().enumerate() {
                    *score += learning_rate * tree.predict_row(&x.row(i)).0;
                }
            }
            if scores.iter().any(|s| !s.is_finite()) {
                return Err(DataError::NonFinite {
                    quantity: "score",
                    iteration: round,
                }
                .into());
            }

            let leaves: usize = round_trees.iter().map(Tree::n_leaves).sum();
            logger.log_metrics(round, &[("leaves", leaves as f64)]);
            trees.extend(round_trees);
        }

        Ok(trees)
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Positive-class probability `σ(base + lr * Σ tree(x))`.
    fn binary_probability(&self, trees: &[Tree<ScalarLeaf>], row: ArrayView1<'_, f64>) -> f64 {
        let sum: f64 = trees.iter().map(|tree| tree.predict_row(&row).0).sum();
        sigmoid(LogisticLoss.base_score() + self.config.learning_rate * sum)
    }

    fn multiclass_index(
        &self,
        n_classes: usize,
        trees: &[Tree<ScalarLeaf>],
        row: ArrayView1<'_, f64>,
    ) -> usize {
        let mut scores = vec![SoftmaxLoss::new(n_classes).base_score(); n_classes];
        for (i, tree) in trees.iter().enumerate() {
            scores[i % n_classes] += self.config.learning_rate * tree.predict_row(&row).0;
        }
        softmax_inplace(&mut scores);
        argmax(scores)
    }
}

impl Default for BoostedEnsemble {
    fn default() -> Self {
        Self::new(BoostedConfig::default())
    }
}

impl Classifier for BoostedEnsemble {
    fn name(&self) -> &'static str {
        "boosted_ensemble"
    }

    fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    fn train(&mut self, training_set: &Dataset) -> Result<(), ClassifierError> {
        self.state = None;
        let data = training_set.to_training_data()?;
        let logger = TrainingLogger::new(self.name(), self.config.verbosity);
        logger.start_training(data.n_samples(), data.n_features(), data.n_classes());

        let ensemble = match data.n_classes() {
            1 => {
                let label = data.label_set.label(0);
                logger.warn(&format!(
                    "training data has the single label {label}; predicting it for every sample"
                ));
                Ensemble::Constant(label)
            }
            2 => Ensemble::Binary(self.boost(&data, &LogisticLoss, &logger)?),
            n_classes => Ensemble::Multiclass {
                n_classes,
                trees: self.boost(&data, &SoftmaxLoss::new(n_classes), &logger)?,
            },
        };

        self.state = Some(Trained {
            ensemble,
            n_features: data.n_features(),
            label_set: data.label_set,
        });
        logger.finish_training(&format!("{} trees", self.trees().len()));
        Ok(())
    }

    fn predict(&self, test_set: &Dataset) -> Result<Vec<u32>, ClassifierError> {
        let state = self.state.as_ref().ok_or(ClassifierError::ModelNotTrained)?;
        let x = test_set.to_prediction_matrix(state.n_features, &state.label_set)?;
        let n_rows = x.nrows();
        if n_rows == 0 {
            return Ok(Vec::new());
        }

        let labels = match &state.ensemble {
            Ensemble::Constant(label) => vec![*label; n_rows],
            Ensemble::Binary(trees) => {
                let probs = run_with_threads(self.config.n_threads, |parallelism| {
                    parallelism.maybe_par_map(0..n_rows, |i| self.binary_probability(trees, x.row(i)))
                });
                let cut = match self.config.threshold {
                    DecisionThreshold::Fixed(t) => t,
                    DecisionThreshold::BatchMean => probs.iter().sum::<f64>() / n_rows as f64,
                };
                probs
                    .into_iter()
                    .map(|p| state.label_set.label(usize::from(p > cut)))
                    .collect()
            }
            Ensemble::Multiclass { n_classes, trees } => {
                let classes = run_with_threads(self.config.n_threads, |parallelism| {
                    parallelism.maybe_par_map(0..n_rows, |i| {
                        self.multiclass_index(*n_classes, trees, x.row(i))
                    })
                });
                classes
                    .into_iter()
                    .map(|class| state.label_set.label(class))
                    .collect()
            }
        };
        Ok(labels)
    }
}
