//! Feed-forward network (multilayer perceptron) trained with Adam.

mod config;
mod model;

pub use config::MlpConfig;
pub use model::FeedForwardNetwork;
