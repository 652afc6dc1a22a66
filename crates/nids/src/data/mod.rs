//! Dataset model shared by every classifier.
//!
//! # Overview
//!
//! - [`Sample`]: one feature vector plus an optional label
//! - [`Dataset`]: ordered samples; [`Dataset::validate`] checks shape invariants
//! - [`LabelSet`]: sorted label universe fixed at training time
//! - [`TrainingData`]: validated, sample-major feature matrix with class indices
//! - [`MinMaxNormalizer`]: optional feature rescaling before training
//!
//! Values are `f64`. Missing values are not supported: every feature must be
//! finite.

mod dataset;
mod labels;
mod normalize;

pub use dataset::{Dataset, Sample, TrainingData};
pub use labels::LabelSet;
pub use normalize::MinMaxNormalizer;
