//! KNN configuration with builder pattern.
//!
//! ```
//! use nids::KnnConfig;
//!
//! let config = KnnConfig::builder().k(3).build().unwrap();
//! assert_eq!(config.k, 3);
//! ```

use std::num::NonZeroUsize;

use bon::Builder;

use crate::error::ConfigError;
use crate::training::Verbosity;

/// Configuration for [`NearestNeighbor`](super::NearestNeighbor).
///
/// KNN draws no random numbers, so it carries no seed.
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct KnnConfig {
    /// Number of neighbors that vote. Default: 5.
    ///
    /// Must not exceed the training set size; that is checked at train time.
    #[builder(default = 5)]
    pub k: usize,

    /// Threads used for prediction. `None` uses all available cores.
    pub n_threads: Option<NonZeroUsize>,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

impl<S: knn_config_builder::IsComplete> KnnConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidNeighbors`] if `k == 0`.
    pub fn build(self) -> Result<KnnConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl KnnConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.k == 0 {
            return Err(ConfigError::InvalidNeighbors);
        }
        Ok(())
    }
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self::builder().__build_internal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = KnnConfig::builder().build().unwrap();
        assert_eq!(config.k, 5);
        assert!(config.n_threads.is_none());
        assert!(KnnConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_k_zero() {
        let result = KnnConfig::builder().k(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidNeighbors)));
    }
}
