//! Adam optimizer.
//!
//! The optimizer owns only its moment estimates. A step takes per-layer
//! gradients and returns per-layer deltas; applying them is up to the caller.

use crate::repr::{Layer, LayerUpdate};

/// Adam hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdamParams {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
}

impl Default for AdamParams {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }
}

/// First/second moment estimates and the step counter.
#[derive(Debug, Clone)]
pub struct AdamState {
    first: Vec<LayerUpdate>,
    second: Vec<LayerUpdate>,
    t: i32,
}

impl AdamState {
    /// Zero moments shaped like `layers`.
    pub fn new(layers: &[Layer]) -> Self {
        Self {
            first: layers.iter().map(LayerUpdate::zeros_like).collect(),
            second: layers.iter().map(LayerUpdate::zeros_like).collect(),
            t: 0,
        }
    }

    /// Number of steps taken.
    pub fn steps(&self) -> i32 {
        self.t
    }

    /// Advance the moments with `grads` and return the parameter deltas
    /// `-lr_t * m / (sqrt(v) + ε)`, where
    /// `lr_t = lr * sqrt(1 - β2^t) / (1 - β1^t)`.
    pub fn step(&mut self, params: &AdamParams, grads: &[LayerUpdate]) -> Vec<LayerUpdate> {
        debug_assert_eq!(grads.len(), self.first.len());
        self.t += 1;
        let lr_t = params.learning_rate * (1.0 - params.beta2.powi(self.t)).sqrt()
            / (1.0 - params.beta1.powi(self.t));

        let (b1, b2, eps) = (params.beta1, params.beta2, params.epsilon);
        self.first
            .iter_mut()
            .zip(self.second.iter_mut())
            .zip(grads)
            .map(|((m, v), g)| {
                m.weights.zip_mut_with(&g.weights, |m, &g| *m = b1 * *m + (1.0 - b1) * g);
                m.bias.zip_mut_with(&g.bias, |m, &g| *m = b1 * *m + (1.0 - b1) * g);
                v.weights.zip_mut_with(&g.weights, |v, &g| *v = b2 * *v + (1.0 - b2) * g * g);
                v.bias.zip_mut_with(&g.bias, |v, &g| *v = b2 * *v + (1.0 - b2) * g * g);

                let delta = |m: f64, v: f64| -lr_t * m / (v.sqrt() + eps);
                let mut weights = m.weights.clone();
                weights.zip_mut_with(&v.weights, |m, &v| *m = delta(*m, v));
                let mut bias = m.bias.clone();
                bias.zip_mut_with(&v.bias, |m, &v| *m = delta(*m, v));
                LayerUpdate { weights, bias }
            })
            .collect()
    }
}
