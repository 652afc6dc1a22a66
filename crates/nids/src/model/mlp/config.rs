//! Network configuration with builder pattern.
//!
//! ```
//! use nids::MlpConfig;
//!
//! let config = MlpConfig::builder()
//!     .hidden_layers(vec![32, 16])
//!     .max_iterations(50)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.hidden_layers, vec![32, 16]);
//! ```

use bon::Builder;

use crate::error::ConfigError;
use crate::training::{AdamParams, Verbosity};

/// Configuration for [`FeedForwardNetwork`](super::FeedForwardNetwork).
///
/// Training runs on the calling thread, so there is no thread count.
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct MlpConfig {
    // === Architecture ===
    /// Units per hidden layer, input side first. Default: `[100]`.
    #[builder(default = vec![100])]
    pub hidden_layers: Vec<usize>,

    /// L2 penalty (α). Default: 1e-4.
    #[builder(default = 1e-4)]
    pub alpha: f64,

    // === Schedule ===
    /// Mini-batch size, capped at the training set size. Default: 200.
    #[builder(default = 200)]
    pub batch_size: usize,

    /// Maximum number of epochs. Default: 200.
    #[builder(default = 200)]
    pub max_iterations: usize,

    /// Training stops once the epoch loss is at most this value. Default: 1e-4.
    #[builder(default = 1e-4)]
    pub tol: f64,

    // === Adam ===
    /// Step size. Default: 1e-3.
    #[builder(default = 1e-3)]
    pub learning_rate: f64,

    /// First-moment decay. Default: 0.9.
    #[builder(default = 0.9)]
    pub beta1: f64,

    /// Second-moment decay. Default: 0.999.
    #[builder(default = 0.999)]
    pub beta2: f64,

    /// Denominator offset. Default: 1e-8.
    #[builder(default = 1e-8)]
    pub epsilon: f64,

    // === Reproducibility ===
    /// Seed of the weight initialization. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    // === Logging ===
    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

impl<S: mlp_config_builder::IsComplete> MlpConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any parameter is invalid:
    /// - a hidden layer with zero units
    /// - `batch_size == 0` or `max_iterations == 0`
    /// - `learning_rate <= 0`
    /// - negative `alpha` or `tol`
    /// - `beta1`/`beta2` outside `[0, 1)`, `epsilon <= 0`
    pub fn build(self) -> Result<MlpConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl MlpConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(layer) = self.hidden_layers.iter().position(|&units| units == 0) {
            return Err(ConfigError::EmptyHiddenLayer { layer });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations);
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ConfigError::InvalidLearningRate(self.learning_rate));
        }
        for (field, value) in [("alpha", self.alpha), ("tol", self.tol)] {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::InvalidRegularization { field, value });
            }
        }
        for (field, value) in [("beta1", self.beta1), ("beta2", self.beta2)] {
            if !(0.0..1.0).contains(&value) {
                return Err(ConfigError::InvalidRatio {
                    field,
                    range: "[0, 1)",
                    value,
                });
            }
        }
        if self.epsilon.is_nan() || self.epsilon <= 0.0 {
            return Err(ConfigError::InvalidRatio {
                field: "epsilon",
                range: "(0, inf)",
                value: self.epsilon,
            });
        }
        Ok(())
    }

    pub(crate) fn adam_params(&self) -> AdamParams {
        AdamParams {
            learning_rate: self.learning_rate,
            beta1: self.beta1,
            beta2: self.beta2,
            epsilon: self.epsilon,
        }
    }
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self::builder().__build_internal()
    }
}
