//! Bagged Gini decision trees with majority vote.

mod config;
mod model;

pub use config::ForestConfig;
pub use model::RandomForest;
