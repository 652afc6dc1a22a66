//! Random forest configuration with builder pattern.
//!
//! ```
//! use nids::{ForestConfig, TreeParams};
//!
//! let config = ForestConfig::builder()
//!     .n_trees(20)
//!     .tree(TreeParams::new(6, 2))
//!     .sample_ratio(0.8)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.tree.max_depth, 6);
//! ```

use std::num::NonZeroUsize;

use bon::Builder;

use crate::error::ConfigError;
use crate::training::{TreeParams, Verbosity};

/// Configuration for [`RandomForest`](super::RandomForest).
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct ForestConfig {
    /// Number of trees. Default: 5.
    #[builder(default = 5)]
    pub n_trees: u32,

    /// Tree shape. Default: depth 3, minimum node size 1.
    #[builder(default = TreeParams::new(3, 1))]
    pub tree: TreeParams,

    /// Bootstrap size as a fraction of the training set. Default: 0.2.
    ///
    /// Rows are drawn with replacement, so ratios above 1 are allowed; at
    /// least one row is always drawn.
    #[builder(default = 0.2)]
    pub sample_ratio: f64,

    // === Resource control ===
    /// Number of threads. `None` uses all available cores.
    pub n_threads: Option<NonZeroUsize>,

    // === Reproducibility ===
    /// Random seed. Default: 42.
    ///
    /// Each tree derives its own stream from this seed and its index, so the
    /// forest does not depend on the thread count.
    #[builder(default = 42)]
    pub seed: u64,

    // === Logging ===
    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

impl<S: forest_config_builder::IsComplete> ForestConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidNTrees`] if `n_trees == 0`
    /// - [`ConfigError::InvalidMaxDepth`] if `tree.max_depth == 0`
    /// - [`ConfigError::InvalidRatio`] unless `sample_ratio` is positive and finite
    pub fn build(self) -> Result<ForestConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl ForestConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.n_trees == 0 {
            return Err(ConfigError::InvalidNTrees);
        }
        self.tree.validate()?;
        if !(self.sample_ratio.is_finite() && self.sample_ratio > 0.0) {
            return Err(ConfigError::InvalidRatio {
                field: "sample_ratio",
                range: "(0, inf)",
                value: self.sample_ratio,
            });
        }
        Ok(())
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self::builder().__build_internal()
    }
}
