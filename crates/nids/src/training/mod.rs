//! Training infrastructure shared by the classifiers.
//!
//! ## Trees
//!
//! - [`TreeGrower`], [`TreeParams`]: greedy depth-first growth
//! - [`GiniCriterion`]: class-impurity splits for forest trees
//! - [`GainCriterion`], [`GainParams`]: second-order splits for boosted trees
//! - [`sampling`]: bootstrap rows, random candidate features, seed mixing
//!
//! ## Boosting
//!
//! - [`Gradients`]: column-major gradient/Hessian storage
//! - [`ObjectiveFn`]: [`LogisticLoss`], [`SoftmaxLoss`]
//!
//! ## Network
//!
//! - [`backprop`]: batch loss and gradients
//! - [`AdamState`], [`AdamParams`]: optimizer returning parameter deltas
//!
//! ## Shared
//!
//! - [`metrics`]: accuracy, F1, cross-entropy
//! - [`TrainingLogger`], [`Verbosity`]: verbosity-gated logging

pub mod backprop;
mod gradients;
mod grower;
mod logger;
pub mod metrics;
mod objectives;
mod optimizer;
pub mod sampling;
mod split;

pub use gradients::Gradients;
pub use grower::{TreeGrower, TreeParams};
pub use logger::{TrainingLogger, Verbosity};
pub use metrics::{accuracy, f1_score, Average};
pub use objectives::{LogisticLoss, ObjectiveFn, SoftmaxLoss};
pub use optimizer::{AdamParams, AdamState};
pub use split::{GainCriterion, GainParams, GiniCriterion, SplitCriterion, SplitInfo};
