//! Gradient-boosted regression trees with second-order (Newton) leaves.

mod config;
mod model;

pub use config::{BoostedConfig, DecisionThreshold};
pub use model::BoostedEnsemble;
