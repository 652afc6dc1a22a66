//! Boosted ensemble configuration with builder pattern.
//!
//! ```
//! use nids::{BoostedConfig, DecisionThreshold, TreeParams};
//!
//! let config = BoostedConfig::builder()
//!     .rounds(50)
//!     .learning_rate(0.1)
//!     .tree(TreeParams::new(4, 2))
//!     .threshold(DecisionThreshold::BatchMean)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.rounds, 50);
//! ```

use std::num::NonZeroUsize;

use bon::Builder;

use crate::error::ConfigError;
use crate::training::{GainParams, TreeParams, Verbosity};

/// How a binary ensemble turns a positive-class probability into a label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecisionThreshold {
    /// Positive iff the probability exceeds this value.
    Fixed(f64),
    /// Positive iff the probability exceeds the mean probability of the
    /// batch being predicted. Predictions then depend on the batch.
    BatchMean,
}

impl Default for DecisionThreshold {
    fn default() -> Self {
        Self::Fixed(0.5)
    }
}

/// Configuration for [`BoostedEnsemble`](super::BoostedEnsemble).
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct BoostedConfig {
    // === Boosting parameters ===
    /// Boosting rounds. Default: 5.
    ///
    /// Binary problems add one tree per round, multiclass problems one tree
    /// per class per round. Zero rounds is allowed and yields a constant
    /// predictor.
    #[builder(default = 5)]
    pub rounds: u32,

    /// Shrinkage applied to every tree output. Default: 0.4.
    #[builder(default = 0.4)]
    pub learning_rate: f64,

    /// Tree shape. Default: depth 5, minimum node size 1.
    #[builder(default = TreeParams::new(5, 1))]
    pub tree: TreeParams,

    // === Regularization ===
    /// L2 penalty on leaf values (λ). Default: 1.5.
    #[builder(default = 1.5)]
    pub lambda: f64,

    /// Gain penalty per split (γ). Default: 1.0.
    #[builder(default = 1.0)]
    pub gamma: f64,

    // === Sampling ===
    /// Fraction of features evaluated at each node. Default: 0.2.
    #[builder(default = 0.2)]
    pub feature_ratio: f64,

    // === Prediction ===
    /// Binary decision rule. Default: `Fixed(0.5)`.
    #[builder(default)]
    pub threshold: DecisionThreshold,

    // === Resource control ===
    /// Threads used for prediction. `None` uses all available cores.
    pub n_threads: Option<NonZeroUsize>,

    // === Reproducibility ===
    /// Random seed. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    // === Logging ===
    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

impl<S: boosted_config_builder::IsComplete> BoostedConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any parameter is invalid:
    /// - `learning_rate <= 0` or not finite
    /// - `tree.max_depth == 0`
    /// - negative `lambda` or `gamma`
    /// - `feature_ratio` outside `(0, 1]`
    /// - a fixed threshold outside `[0, 1]`
    pub fn build(self) -> Result<BoostedConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl BoostedConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ConfigError::InvalidLearningRate(self.learning_rate));
        }
        self.tree.validate()?;

        for (field, value) in [("lambda", self.lambda), ("gamma", self.gamma)] {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::InvalidRegularization { field, value });
            }
        }

        if !(self.feature_ratio > 0.0 && self.feature_ratio <= 1.0) {
            return Err(ConfigError::InvalidRatio {
                field: "feature_ratio",
                range: "(0, 1]",
                value: self.feature_ratio,
            });
        }

        if let DecisionThreshold::Fixed(t) = self.threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(ConfigError::InvalidRatio {
                    field: "threshold",
                    range: "[0, 1]",
                    value: t,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn gain_params(&self) -> GainParams {
        GainParams {
            lambda: self.lambda,
            gamma: self.gamma,
        }
    }
}

impl Default for BoostedConfig {
    fn default() -> Self {
        Self::builder().__build_internal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BoostedConfig::builder().build().unwrap();
        assert_eq!(config.rounds, 5);
        assert_eq!(config.tree, TreeParams::new(5, 1));
        assert!((config.learning_rate - 0.4).abs() < 1e-12);
        assert_eq!(config.threshold, DecisionThreshold::Fixed(0.5));
        assert!(BoostedConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_rounds_is_valid() {
        assert!(BoostedConfig::builder().rounds(0).build().is_ok());
    }

    #[test]
    fn test_invalid_learning_rate() {
        for lr in [0.0, -0.1, f64::INFINITY] {
            let result = BoostedConfig::builder().learning_rate(lr).build();
            assert!(matches!(result, Err(ConfigError::InvalidLearningRate(_))));
        }
    }

    #[test]
    fn test_negative_regularization() {
        let result = BoostedConfig::builder().lambda(-1.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidRegularization { field: "lambda", .. })
        ));
        let result = BoostedConfig::builder().gamma(-0.5).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidRegularization { field: "gamma", .. })
        ));
    }

    #[test]
    fn test_feature_ratio_bounds() {
        let result = BoostedConfig::builder().feature_ratio(0.0).build();
        assert!(matches!(result, Err(ConfigError::InvalidRatio { field: "feature_ratio", .. })));
        assert!(BoostedConfig::builder().feature_ratio(1.0).build().is_ok());
    }

    #[test]
    fn test_fixed_threshold_bounds() {
        let result = BoostedConfig::builder()
            .threshold(DecisionThreshold::Fixed(1.5))
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidRatio { field: "threshold", .. })));
    }
}
