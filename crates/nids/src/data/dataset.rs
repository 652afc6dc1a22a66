//! Sample and dataset containers.
//!
//! This module provides [`Sample`], [`Dataset`] and the validated
//! [`TrainingData`] a classifier works from.

use ndarray::Array2;

use crate::error::DataError;

use super::labels::LabelSet;

/// One traffic record: a numeric feature vector and an optional label.
///
/// `label == None` marks an unlabeled (or unknown) record. Label `0`
/// conventionally denotes "no attack".
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: Vec<f64>,
    pub label: Option<u32>,
}

impl Sample {
    /// Labeled sample.
    pub fn new(features: Vec<f64>, label: u32) -> Self {
        Self {
            features,
            label: Some(label),
        }
    }

    /// Sample without a label (e.g. live traffic to classify).
    pub fn unlabeled(features: Vec<f64>) -> Self {
        Self {
            features,
            label: None,
        }
    }

    /// Sample from an upstream converter that encodes "unknown" as a negative
    /// label (conventionally `-1`).
    pub fn with_raw_label(features: Vec<f64>, raw_label: i64) -> Self {
        Self {
            features,
            label: u32::try_from(raw_label).ok(),
        }
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.len()
    }
}

/// Ordered collection of samples.
///
/// A dataset is a plain container: construction never fails. The shape
/// invariants (non-empty, uniform dimensionality, finite values) are checked
/// by [`Dataset::validate`] and by the classifiers at `train`/`predict` time.
///
/// # Example
///
/// ```
/// use nids::data::{Dataset, Sample};
///
/// let ds: Dataset = vec![
///     Sample::new(vec![0.1, 0.2], 0),
///     Sample::new(vec![0.9, 0.8], 1),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(ds.len(), 2);
/// assert_eq!(ds.validate().unwrap(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Build a labeled dataset from parallel row/label vectors.
    ///
    /// Fails with [`DataError::LabelCountMismatch`] if the lengths differ.
    pub fn from_rows(rows: Vec<Vec<f64>>, labels: Vec<u32>) -> Result<Self, DataError> {
        if rows.len() != labels.len() {
            return Err(DataError::LabelCountMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        Ok(rows
            .into_iter()
            .zip(labels)
            .map(|(features, label)| Sample::new(features, label))
            .collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// Dimensionality of the first sample, if any.
    pub fn n_features(&self) -> Option<usize> {
        self.samples.first().map(Sample::n_features)
    }

    /// Labels in sample order.
    pub fn labels(&self) -> impl Iterator<Item = Option<u32>> + '_ {
        self.samples.iter().map(|s| s.label)
    }

    /// New dataset holding clones of the samples at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        indices.iter().map(|&i| self.samples[i].clone()).collect()
    }

    /// Check the shape invariants and return the dimensionality.
    ///
    /// # Errors
    ///
    /// - [`DataError::Empty`] for a dataset with no samples
    /// - [`DataError::FeatureMismatch`] if a sample's length differs from the first
    /// - [`DataError::NonFiniteFeature`] for NaN or infinite values
    pub fn validate(&self) -> Result<usize, DataError> {
        let n_features = self.n_features().ok_or(DataError::Empty)?;
        self.check_features(n_features)?;
        Ok(n_features)
    }

    /// Check that every sample has `n_features` finite values.
    ///
    /// Unlike [`validate`](Self::validate) an empty dataset passes.
    pub fn check_features(&self, n_features: usize) -> Result<(), DataError> {
        for (index, sample) in self.samples.iter().enumerate() {
            if sample.n_features() != n_features {
                return Err(DataError::FeatureMismatch {
                    index,
                    expected: n_features,
                    got: sample.n_features(),
                });
            }
            if let Some(feature) = sample.features.iter().position(|v| !v.is_finite()) {
                return Err(DataError::NonFiniteFeature { index, feature });
            }
        }
        Ok(())
    }

    /// Sample-major feature matrix `[n_samples, n_features]`.
    ///
    /// Callers validate first; rows are assumed to share one length.
    pub fn feature_matrix(&self, n_features: usize) -> Array2<f64> {
        let mut matrix = Array2::zeros((self.len(), n_features));
        for (mut row, sample) in matrix.rows_mut().into_iter().zip(&self.samples) {
            for (dst, &src) in row.iter_mut().zip(&sample.features) {
                *dst = src;
            }
        }
        matrix
    }

    /// Validate for training and extract features, class indices and labels.
    pub fn to_training_data(&self) -> Result<TrainingData, DataError> {
        let n_features = self.validate()?;

        let mut raw_labels = Vec::with_capacity(self.len());
        for (index, sample) in self.samples.iter().enumerate() {
            raw_labels.push(sample.label.ok_or(DataError::Unlabeled { index })?);
        }

        let label_set = LabelSet::from_labels(raw_labels.iter().copied());
        let classes = raw_labels
            .iter()
            .map(|&label| label_set.index_of(label).unwrap_or_default())
            .collect();

        Ok(TrainingData {
            features: self.feature_matrix(n_features),
            classes,
            label_set,
        })
    }

    /// Validate a test set against a trained model's dimensionality and label
    /// universe, and extract its feature matrix.
    ///
    /// An empty test set is valid and yields a `[0, n_features]` matrix.
    pub fn to_prediction_matrix(
        &self,
        n_features: usize,
        label_set: &LabelSet,
    ) -> Result<Array2<f64>, DataError> {
        self.check_features(n_features)?;
        for (index, sample) in self.samples.iter().enumerate() {
            if let Some(label) = sample.label {
                if label_set.index_of(label).is_none() {
                    return Err(DataError::UnknownLabel { index, label });
                }
            }
        }
        Ok(self.feature_matrix(n_features))
    }
}

impl FromIterator<Sample> for Dataset {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Dataset {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl From<Vec<Sample>> for Dataset {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

/// Validated training view of a [`Dataset`].
///
/// `classes[i]` is the index of sample `i`'s label in `label_set`.
#[derive(Debug, Clone)]
pub struct TrainingData {
    /// `[n_samples, n_features]`.
    pub features: Array2<f64>,
    pub classes: Vec<usize>,
    pub label_set: LabelSet,
}

impl TrainingData {
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    #[inline]
    pub fn n_classes(&self) -> usize {
        self.label_set.len()
    }
}
