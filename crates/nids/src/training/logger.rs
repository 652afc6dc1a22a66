//! Verbosity-gated training output.
//!
//! Every classifier config carries a [`Verbosity`]; trainers report through a
//! [`TrainingLogger`], which forwards to `tracing` only the events the level
//! allows. Installing a subscriber is left to the application.

/// How much a trainer reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    /// Nothing.
    #[default]
    Silent,
    /// Degenerate situations only.
    Warning,
    /// Start and completion summaries.
    Info,
    /// Per-round / per-epoch metrics.
    Debug,
}

/// Trainer-side logger.
#[derive(Debug, Clone)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    model: &'static str,
}

impl TrainingLogger {
    pub fn new(model: &'static str, verbosity: Verbosity) -> Self {
        Self { verbosity, model }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    fn enabled(&self, level: Verbosity) -> bool {
        self.verbosity >= level
    }

    pub fn start_training(&self, n_samples: usize, n_features: usize, n_classes: usize) {
        if self.enabled(Verbosity::Info) {
            tracing::info!(
                model = self.model,
                n_samples,
                n_features,
                n_classes,
                "training started"
            );
        }
    }

    /// Metrics for one round/epoch, e.g. `[("loss", 0.31)]`.
    pub fn log_metrics(&self, round: usize, metrics: &[(&str, f64)]) {
        if !self.enabled(Verbosity::Debug) {
            return;
        }
        let rendered = metrics
            .iter()
            .map(|(name, value)| format!("{name}={value:.6}"))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!(model = self.model, round, "{rendered}");
    }

    pub fn warn(&self, message: &str) {
        if self.enabled(Verbosity::Warning) {
            tracing::warn!(model = self.model, "{message}");
        }
    }

    pub fn finish_training(&self, summary: &str) {
        if self.enabled(Verbosity::Info) {
            tracing::info!(model = self.model, "training finished: {summary}");
        }
    }
}
