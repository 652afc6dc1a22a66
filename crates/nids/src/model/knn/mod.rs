//! Distance-weighted k-nearest-neighbor classifier.

mod config;
mod model;

pub use config::KnnConfig;
pub use model::NearestNeighbor;
