//! Per-feature min/max rescaling.

use crate::error::{ConfigError, DataError};

use super::dataset::{Dataset, Sample};

/// Rescales every feature into `[min, max]` using statistics from the
/// training set.
///
/// Statistics come from [`fit_transform`](Self::fit_transform) only, so a test
/// set is rescaled exactly like the data the model saw. Test values outside the
/// training range extrapolate linearly. A feature that is constant in the
/// training set maps to `max`.
///
/// # Example
///
/// ```
/// use nids::data::{Dataset, MinMaxNormalizer, Sample};
///
/// let train = Dataset::new(vec![
///     Sample::new(vec![0.0, 10.0], 0),
///     Sample::new(vec![5.0, 20.0], 1),
/// ]);
/// let mut norm = MinMaxNormalizer::default();
/// let scaled = norm.fit_transform(&train).unwrap();
/// assert_eq!(scaled.samples()[1].features, vec![1.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct MinMaxNormalizer {
    target_min: f64,
    target_max: f64,
    /// Per-feature `(min, max)` of the fitted training set.
    stats: Option<Vec<(f64, f64)>>,
}

impl Default for MinMaxNormalizer {
    fn default() -> Self {
        Self {
            target_min: 0.0,
            target_max: 1.0,
            stats: None,
        }
    }
}

impl MinMaxNormalizer {
    /// Normalizer targeting `[min, max]`.
    ///
    /// Fails with [`ConfigError::InvalidRange`] unless `min < max` and both
    /// are finite.
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(ConfigError::InvalidRange { min, max });
        }
        Ok(Self {
            target_min: min,
            target_max: max,
            stats: None,
        })
    }

    pub fn is_fitted(&self) -> bool {
        self.stats.is_some()
    }

    /// Record per-feature statistics from `train` and return it rescaled.
    ///
    /// Refitting replaces earlier statistics.
    pub fn fit_transform(&mut self, train: &Dataset) -> Result<Dataset, DataError> {
        let n_features = train.validate()?;

        let mut stats = vec![(f64::INFINITY, f64::NEG_INFINITY); n_features];
        for sample in train {
            for ((lo, hi), &v) in stats.iter_mut().zip(&sample.features) {
                *lo = lo.min(v);
                *hi = hi.max(v);
            }
        }

        self.stats = Some(stats);
        self.transform(train)
    }

    /// Rescale `data` with the fitted statistics. Labels are kept.
    ///
    /// # Errors
    ///
    /// - [`DataError::NotNormalized`] before [`fit_transform`](Self::fit_transform)
    /// - [`DataError::FeatureMismatch`] / [`DataError::NonFiniteFeature`] on a
    ///   malformed sample
    pub fn transform(&self, data: &Dataset) -> Result<Dataset, DataError> {
        let stats = self.stats.as_ref().ok_or(DataError::NotNormalized)?;
        data.check_features(stats.len())?;

        let span = self.target_max - self.target_min;
        Ok(data
            .iter()
            .map(|sample| {
                let features = sample
                    .features
                    .iter()
                    .zip(stats)
                    .map(|(&v, &(lo, hi))| {
                        let range = hi - lo;
                        if range == 0.0 {
                            self.target_max
                        } else {
                            self.target_min + (v - lo) / range * span
                        }
                    })
                    .collect();
                Sample {
                    features,
                    label: sample.label,
                }
            })
            .collect())
    }
}
