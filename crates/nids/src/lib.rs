//! nids: classification engines for network intrusion detection.
//!
//! Four interchangeable classifiers over labeled numeric feature vectors,
//! all behind the [`Classifier`] trait.
//!
//! # Key Types
//!
//! - [`NearestNeighbor`] / [`KnnConfig`] - distance-weighted KNN
//! - [`RandomForest`] / [`ForestConfig`] - bagged Gini trees
//! - [`BoostedEnsemble`] / [`BoostedConfig`] - second-order boosted trees
//! - [`FeedForwardNetwork`] / [`MlpConfig`] - ReLU MLP trained with Adam
//! - [`Dataset`] / [`Sample`] - input data
//! - [`MinMaxNormalizer`] - optional feature rescaling
//!
//! # Training
//!
//! Build a config with `XxxConfig::builder()`, wrap it in a classifier, then
//! call [`Classifier::train`] and [`Classifier::predict`]. See the [`model`]
//! module for an example, and [`training::metrics`] for scoring predictions.

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod data;
pub mod error;
pub mod model;
pub mod repr;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Classifiers and their configuration
pub use model::{
    BoostedConfig, BoostedEnsemble, Classifier, DecisionThreshold, FeedForwardNetwork,
    ForestConfig, KnnConfig, MlpConfig, NearestNeighbor, RandomForest, TreeParams,
};

// Data types
pub use data::{Dataset, LabelSet, MinMaxNormalizer, Sample};

// Errors
pub use error::{ClassifierError, ConfigError, DataError};

// Training output control
pub use training::Verbosity;

// Shared utilities
pub use utils::{run_with_threads, Parallelism};
