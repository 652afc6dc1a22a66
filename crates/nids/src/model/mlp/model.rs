//! Feed-forward network model.

use ndarray::{s, Array2};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::MlpConfig;
use crate::data::{Dataset, LabelSet};
use crate::error::{ClassifierError, ConfigError, DataError};
use crate::model::Classifier;
use crate::repr::{Network, OutputActivation};
use crate::training::backprop::{backward, batch_loss};
use crate::training::{AdamState, TrainingLogger};
use crate::utils::argmax;

/// ReLU multilayer perceptron with a logistic (two labels) or softmax
/// (more labels) output layer, trained by mini-batch Adam.
///
/// Batches are taken in dataset order; there is no shuffling between epochs.
#[derive(Debug, Clone)]
pub struct FeedForwardNetwork {
    config: MlpConfig,
    state: Option<Trained>,
}

#[derive(Debug, Clone)]
struct Trained {
    network: Network,
    label_set: LabelSet,
    /// Epoch losses in training order.
    loss_curve: Vec<f64>,
}

impl FeedForwardNetwork {
    pub fn new(config: MlpConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &MlpConfig {
        &self.config
    }

    /// Trained weights, if trained.
    pub fn network(&self) -> Option<&Network> {
        self.state.as_ref().map(|s| &s.network)
    }

    /// Loss of each training epoch; empty before training.
    pub fn loss_curve(&self) -> &[f64] {
        self.state
            .as_ref()
            .map(|s| s.loss_curve.as_slice())
            .unwrap_or_default()
    }
}

impl Default for FeedForwardNetwork {
    fn default() -> Self {
        Self::new(MlpConfig::default())
    }
}

fn one_hot(classes: &[usize], n_classes: usize) -> Array2<f64> {
    let mut targets = Array2::zeros((classes.len(), n_classes));
    for (row, &class) in classes.iter().enumerate() {
        targets[[row, class]] = 1.0;
    }
    targets
}

impl Classifier for FeedForwardNetwork {
    fn name(&self) -> &'static str {
        "feed_forward_network"
    }

    fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    fn train(&mut self, training_set: &Dataset) -> Result<(), ClassifierError> {
        self.state = None;
        let data = training_set.to_training_data()?;
        let logger = TrainingLogger::new(self.name(), self.config.verbosity);
        logger.start_training(data.n_samples(), data.n_features(), data.n_classes());

        let n_classes = data.n_classes();
        let output = match n_classes {
            2 => OutputActivation::Logistic,
            n if n > 2 => OutputActivation::Softmax,
            n => return Err(ConfigError::AmbiguousLabelCardinality(n).into()),
        };

        let sizes: Vec<usize> = std::iter::once(data.n_features())
            .chain(self.config.hidden_layers.iter().copied())
            .chain(std::iter::once(n_classes))
            .collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.seed);
        let mut network = Network::glorot(&sizes, output, &mut rng);

        let x = data.features.view();
        let targets = one_hot(&data.classes, n_classes);
        let n_samples = data.n_samples();
        let batch_size = self.config.batch_size.min(n_samples);
        let alpha = self.config.alpha;
        let adam = self.config.adam_params();
        let mut optimizer = AdamState::new(network.layers());
        let mut loss_curve = Vec::new();

        for iteration in 0..self.config.max_iterations {
            let mut epoch_loss = 0.0;
            for start in (0..n_samples).step_by(batch_size) {
                let end = (start + batch_size).min(n_samples);
                let xb = x.slice(s![start..end, ..]);
                let yb = targets.slice(s![start..end, ..]);

                let activations = network.forward(xb);
                let Some(out) = activations.last() else {
                    break;
                };
                let loss = batch_loss(&network, out.view(), yb, alpha);
                if !loss.is_finite() {
                    return Err(DataError::NonFinite {
                        quantity: "loss",
                        iteration,
                    }
                    .into());
                }
                epoch_loss += loss * (end - start) as f64;

                let grads = backward(&network, xb, &activations, yb, alpha);
                let deltas = optimizer.step(&adam, &grads);
                network.apply(&deltas);
            }
            epoch_loss /= n_samples as f64;
            loss_curve.push(epoch_loss);
            logger.log_metrics(iteration, &[("loss", epoch_loss)]);

            if epoch_loss <= self.config.tol {
                break;
            }
        }

        logger.finish_training(&format!(
            "{} epochs, {} optimizer steps, final loss {:.6}",
            loss_curve.len(),
            optimizer.steps(),
            loss_curve.last().copied().unwrap_or(f64::NAN)
        ));
        self.state = Some(Trained {
            network,
            label_set: data.label_set,
            loss_curve,
        });
        Ok(())
    }

    fn predict(&self, test_set: &Dataset) -> Result<Vec<u32>, ClassifierError> {
        let state = self.state.as_ref().ok_or(ClassifierError::ModelNotTrained)?;
        let x = test_set.to_prediction_matrix(state.network.n_inputs(), &state.label_set)?;
        if x.nrows() == 0 {
            return Ok(Vec::new());
        }

        let proba = state.network.predict_proba(x.view());
        Ok(proba
            .rows()
            .into_iter()
            .map(|row| state.label_set.label(argmax(row.iter().copied())))
            .collect())
    }
}
