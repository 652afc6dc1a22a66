//! Error types shared by every classifier.
//!
//! - [`ConfigError`]: an invalid or unusable hyperparameter
//! - [`DataError`]: a dataset that violates the shape/label invariants
//! - [`ClassifierError`]: what `train`/`predict` return, wrapping both plus
//!   the "not trained yet" case

/// Invalid hyperparameter, detected when a config is built or when it meets
/// a concrete training set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Number of neighbors must be at least 1.
    #[error("k must be at least 1")]
    InvalidNeighbors,

    /// More neighbors requested than there are training samples.
    #[error("k ({k}) exceeds the number of training samples ({n_samples})")]
    NeighborsExceedSamples { k: usize, n_samples: usize },

    /// Number of trees must be at least 1.
    #[error("n_trees must be at least 1")]
    InvalidNTrees,

    /// Maximum depth must be at least 1.
    #[error("max_depth must be at least 1")]
    InvalidMaxDepth,

    /// Learning rate must be positive and finite.
    #[error("learning_rate must be positive, got {0}")]
    InvalidLearningRate(f64),

    /// A ratio outside of its allowed interval.
    #[error("{field} must be in {range}, got {value}")]
    InvalidRatio {
        field: &'static str,
        range: &'static str,
        value: f64,
    },

    /// A regularization term that must be non-negative.
    #[error("{field} must be non-negative, got {value}")]
    InvalidRegularization { field: &'static str, value: f64 },

    /// A hidden layer with no units.
    #[error("hidden layer {layer} must have at least one unit")]
    EmptyHiddenLayer { layer: usize },

    /// Batch size must be at least 1.
    #[error("batch_size must be at least 1")]
    InvalidBatchSize,

    /// Iteration budget must be at least 1.
    #[error("max_iterations must be at least 1")]
    InvalidMaxIterations,

    /// The network needs exactly two labels (logistic output) or more than
    /// two (softmax output).
    #[error("ambiguous label cardinality: expected 2 or more distinct labels, got {0}")]
    AmbiguousLabelCardinality(usize),

    /// Normalization range with `min >= max`.
    #[error("normalization range is empty: [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },
}

/// Dataset violating the invariants a classifier relies on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    #[error("dataset is empty")]
    Empty,

    #[error("sample {index} has {got} features, expected {expected}")]
    FeatureMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("sample {index} has a non-finite value at feature {feature}")]
    NonFiniteFeature { index: usize, feature: usize },

    #[error("training sample {index} has no label")]
    Unlabeled { index: usize },

    #[error("sample {index} carries label {label}, which was not seen during training")]
    UnknownLabel { index: usize, label: u32 },

    /// Training produced a NaN/infinite loss or score.
    #[error("non-finite {quantity} at iteration {iteration}")]
    NonFinite {
        quantity: &'static str,
        iteration: usize,
    },

    #[error("samples not normalized: fit the normalizer on the training set first")]
    NotNormalized,

    #[error("label sequences differ in length: {truth} true labels, {predicted} predictions")]
    LengthMismatch { truth: usize, predicted: usize },

    #[error("{rows} feature rows but {labels} labels")]
    LabelCountMismatch { rows: usize, labels: usize },
}

/// Error returned by [`Classifier::train`](crate::model::Classifier::train) and
/// [`Classifier::predict`](crate::model::Classifier::predict).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("model has not been trained")]
    ModelNotTrained,

    /// A tree ensemble holds no trees to vote.
    #[error("ensemble has no trees")]
    EmptyEnsemble,

    /// A grown tree failed structural validation.
    #[error("malformed tree: {0}")]
    MalformedTree(#[from] crate::repr::TreeValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_classifier_error() {
        let err: ClassifierError = ConfigError::InvalidNTrees.into();
        assert!(matches!(err, ClassifierError::Config(ConfigError::InvalidNTrees)));
    }

    #[test]
    fn messages_name_the_offending_value() {
        let err = ConfigError::NeighborsExceedSamples { k: 7, n_samples: 3 };
        assert_eq!(
            err.to_string(),
            "k (7) exceeds the number of training samples (3)"
        );

        let err = DataError::NotNormalized;
        assert!(err.to_string().starts_with("samples not normalized"));
    }
}
