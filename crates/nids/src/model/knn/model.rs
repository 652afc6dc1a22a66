//! KNN model: stores the training set, votes at prediction time.

use std::cmp::Ordering;

use ndarray::{Array2, ArrayView1};

use super::KnnConfig;
use crate::data::{Dataset, LabelSet};
use crate::error::{ClassifierError, ConfigError};
use crate::model::Classifier;
use crate::training::TrainingLogger;
use crate::utils::{argmax, run_with_threads};

/// Added to every distance before inverting it into a vote weight.
const DISTANCE_OFFSET: f64 = 0.1;

/// Distance-weighted k-nearest-neighbor classifier.
///
/// Each of the `k` closest training samples votes for its class with weight
/// `1 / (distance + 0.1)`. Equal distances are ordered by training position.
#[derive(Debug, Clone)]
pub struct NearestNeighbor {
    config: KnnConfig,
    state: Option<Memory>,
}

#[derive(Debug, Clone)]
struct Memory {
    features: Array2<f64>,
    classes: Vec<usize>,
    label_set: LabelSet,
}

impl NearestNeighbor {
    pub fn new(config: KnnConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &KnnConfig {
        &self.config
    }

    /// Labels seen during training, if trained.
    pub fn label_set(&self) -> Option<&LabelSet> {
        self.state.as_ref().map(|s| &s.label_set)
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    fn predict_row(&self, memory: &Memory, row: ArrayView1<'_, f64>) -> usize {
        let mut distances: Vec<(f64, usize)> = memory
            .features
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, train_row)| (euclidean(row, train_row), i))
            .collect();

        // (distance, index) is a total order, so the k smallest under it are
        // exactly the first k of a stable sort by distance.
        let k = self.config.k.min(distances.len());
        let by_distance = |a: &(f64, usize), b: &(f64, usize)| -> Ordering {
            a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
        };
        if k < distances.len() {
            distances.select_nth_unstable_by(k, by_distance);
        }

        let mut weights = vec![0.0; memory.label_set.len()];
        for &(distance, i) in &distances[..k] {
            weights[memory.classes[i]] += 1.0 / (distance + DISTANCE_OFFSET);
        }
        argmax(weights)
    }
}

impl Default for NearestNeighbor {
    fn default() -> Self {
        Self::new(KnnConfig::default())
    }
}

fn euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

impl Classifier for NearestNeighbor {
    fn name(&self) -> &'static str {
        "knn"
    }

    fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    fn train(&mut self, training_set: &Dataset) -> Result<(), ClassifierError> {
        self.state = None;
        let data = training_set.to_training_data()?;
        let logger = TrainingLogger::new(self.name(), self.config.verbosity);
        logger.start_training(data.n_samples(), data.n_features(), data.n_classes());

        if self.config.k > data.n_samples() {
            return Err(ConfigError::NeighborsExceedSamples {
                k: self.config.k,
                n_samples: data.n_samples(),
            }
            .into());
        }

        self.state = Some(Memory {
            features: data.features,
            classes: data.classes,
            label_set: data.label_set,
        });
        logger.finish_training(&format!("stored {} samples", training_set.len()));
        Ok(())
    }

    fn predict(&self, test_set: &Dataset) -> Result<Vec<u32>, ClassifierError> {
        let memory = self.state.as_ref().ok_or(ClassifierError::ModelNotTrained)?;
        let x = test_set.to_prediction_matrix(memory.features.ncols(), &memory.label_set)?;
        if x.nrows() == 0 {
            return Ok(Vec::new());
        }

        let classes = run_with_threads(self.config.n_threads, |parallelism| {
            parallelism.maybe_par_map(0..x.nrows(), |i| self.predict_row(memory, x.row(i)))
        });
        Ok(classes
            .into_iter()
            .map(|class| memory.label_set.label(class))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Sample;

    fn line_dataset() -> Dataset {
        Dataset::from_rows(
            vec![vec![0.0], vec![1.0], vec![2.0], vec![10.0], vec![11.0]],
            vec![3, 3, 3, 8, 8],
        )
        .unwrap()
    }

    fn knn(k: usize) -> NearestNeighbor {
        NearestNeighbor::new(KnnConfig::builder().k(k).build().unwrap())
    }

    #[test]
    fn predict_before_train_fails() {
        let model = knn(1);
        assert_eq!(
            model.predict(&line_dataset()),
            Err(ClassifierError::ModelNotTrained)
        );
    }

    #[test]
    fn k_larger_than_training_set_is_rejected() {
        let mut model = knn(6);
        let err = model.train(&line_dataset()).unwrap_err();
        assert_eq!(
            err,
            ClassifierError::Config(ConfigError::NeighborsExceedSamples { k: 6, n_samples: 5 })
        );
        assert!(!model.is_trained());
    }

    #[test]
    fn rejected_retrain_forgets_previous_training() {
        let mut model = knn(3);
        model.train(&line_dataset()).unwrap();
        let tiny = Dataset::from_rows(vec![vec![9.0]], vec![1]).unwrap();
        assert_eq!(
            model.train(&tiny).unwrap_err(),
            ClassifierError::Config(ConfigError::NeighborsExceedSamples { k: 3, n_samples: 1 })
        );
        assert!(!model.is_trained());
        assert!(model.label_set().is_none());
        let test = Dataset::new(vec![Sample::unlabeled(vec![9.0])]);
        assert_eq!(model.predict(&test), Err(ClassifierError::ModelNotTrained));
    }

    #[test]
    fn closer_neighbors_outweigh_a_majority() {
        // Two far votes for 3 (d=8, 9) vs one near vote for 8 (d=0):
        // 1/8.1 + 1/9.1 < 1/0.1
        let train = Dataset::from_rows(vec![vec![2.0], vec![1.0], vec![10.0]], vec![3, 3, 8]).unwrap();
        let mut model = knn(3);
        model.train(&train).unwrap();
        let test = Dataset::new(vec![Sample::unlabeled(vec![10.0])]);
        assert_eq!(model.predict(&test).unwrap(), vec![8]);
    }

    #[test]
    fn equal_weights_go_to_lowest_class() {
        let train = Dataset::from_rows(vec![vec![-1.0], vec![1.0]], vec![5, 2]).unwrap();
        let mut model = knn(2);
        model.train(&train).unwrap();
        let test = Dataset::new(vec![Sample::unlabeled(vec![0.0])]);
        // Label 2 has class index 0 in the sorted label set.
        assert_eq!(model.predict(&test).unwrap(), vec![2]);
    }

    #[test]
    fn equidistant_neighbors_follow_training_order() {
        // Three samples at distance 1; k=1 picks the first one seen.
        let train =
            Dataset::from_rows(vec![vec![1.0], vec![-1.0], vec![1.0]], vec![7, 4, 4]).unwrap();
        let mut model = knn(1);
        model.train(&train).unwrap();
        let test = Dataset::new(vec![Sample::unlabeled(vec![0.0])]);
        assert_eq!(model.predict(&test).unwrap(), vec![7]);
    }

    #[test]
    fn empty_test_set_predicts_nothing() {
        let mut model = knn(1);
        model.train(&line_dataset()).unwrap();
        assert_eq!(model.predict(&Dataset::default()).unwrap(), Vec::<u32>::new());
    }
}
