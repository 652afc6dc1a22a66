//! The four classifiers and their shared contract.
//!
//! # Overview
//!
//! - [`NearestNeighbor`]: distance-weighted KNN
//! - [`RandomForest`]: bagged Gini trees with majority vote
//! - [`BoostedEnsemble`]: second-order gradient-boosted regression trees
//! - [`FeedForwardNetwork`]: ReLU MLP trained with Adam
//!
//! Each classifier is built from a validated config and trained in place:
//!
//! ```
//! use nids::{Classifier, Dataset, KnnConfig, NearestNeighbor};
//!
//! let train = Dataset::from_rows(
//!     vec![vec![0.0, 0.0], vec![0.1, 0.0], vec![5.0, 5.0], vec![5.1, 5.0]],
//!     vec![0, 0, 1, 1],
//! )?;
//! let mut knn = NearestNeighbor::new(KnnConfig::builder().k(1).build()?);
//! knn.train(&train)?;
//!
//! let test = Dataset::from_rows(vec![vec![4.9, 5.2]], vec![1])?;
//! assert_eq!(knn.predict(&test)?, vec![1]);
//! # Ok::<(), nids::ClassifierError>(())
//! ```

pub mod boosted;
pub mod forest;
pub mod knn;
pub mod mlp;

pub use boosted::{BoostedConfig, BoostedEnsemble, DecisionThreshold};
pub use forest::{ForestConfig, RandomForest};
pub use knn::{KnnConfig, NearestNeighbor};
pub use mlp::{FeedForwardNetwork, MlpConfig};

pub use crate::training::TreeParams;

use crate::data::Dataset;
use crate::error::ClassifierError;

/// Uniform train/predict contract shared by every classifier.
pub trait Classifier {
    /// Short, stable identifier used in logs and reports.
    fn name(&self) -> &'static str;

    fn is_trained(&self) -> bool;

    /// Fit on a labeled dataset, replacing any previous state.
    ///
    /// # Errors
    ///
    /// [`ClassifierError::Data`] for an empty, ragged, non-finite or
    /// unlabeled dataset; [`ClassifierError::Config`] when a hyperparameter
    /// cannot work with this dataset.
    fn train(&mut self, training_set: &Dataset) -> Result<(), ClassifierError>;

    /// One label per sample of `test_set`, in input order.
    ///
    /// # Errors
    ///
    /// [`ClassifierError::ModelNotTrained`] before [`train`](Self::train);
    /// [`ClassifierError::Data`] on a dimensionality change or a label the
    /// training set never contained.
    fn predict(&self, test_set: &Dataset) -> Result<Vec<u32>, ClassifierError>;
}
