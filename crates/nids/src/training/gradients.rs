//! Structure-of-Arrays gradient buffer with column-major layout.
//!
//! For `n_samples` samples and `n_outputs` outputs (1 for binary boosting,
//! K for K-class boosting):
//!
//! ```text
//! grads: [s0_o0, s1_o0, ..., sN_o0, s0_o1, s1_o1, ..., sN_o1, ...]
//! hess:  [s0_o0, s1_o0, ..., sN_o0, s0_o1, s1_o1, ..., sN_o1, ...]
//! ```
//!
//! Index formula: `grads[output * n_samples + sample]`. One tree is grown per
//! output from the contiguous `output_grads(k)` / `output_hess(k)` slices.

/// Gradient/Hessian buffer.
///
/// # Example
///
/// ```
/// use nids::training::Gradients;
///
/// let mut buffer = Gradients::new(4, 3);
/// buffer.set(0, 2, -0.5, 0.25);
///
/// assert_eq!(buffer.get(0, 2), (-0.5, 0.25));
/// assert_eq!(buffer.output_grads(2)[0], -0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Gradients {
    grads: Vec<f64>,
    hess: Vec<f64>,
    n_samples: usize,
    n_outputs: usize,
}

impl Gradients {
    /// Zero-initialized buffer.
    pub fn new(n_samples: usize, n_outputs: usize) -> Self {
        let size = n_samples * n_outputs;
        Self {
            grads: vec![0.0; size],
            hess: vec![0.0; size],
            n_samples,
            n_outputs,
        }
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    #[inline]
    pub fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    #[inline]
    pub fn get(&self, sample: usize, output: usize) -> (f64, f64) {
        let idx = output * self.n_samples + sample;
        (self.grads[idx], self.hess[idx])
    }

    #[inline]
    pub fn set(&mut self, sample: usize, output: usize, grad: f64, hess: f64) {
        let idx = output * self.n_samples + sample;
        self.grads[idx] = grad;
        self.hess[idx] = hess;
    }

    /// Gradients of every sample for one output.
    #[inline]
    pub fn output_grads(&self, output: usize) -> &[f64] {
        let start = output * self.n_samples;
        &self.grads[start..start + self.n_samples]
    }

    /// Hessians of every sample for one output.
    #[inline]
    pub fn output_hess(&self, output: usize) -> &[f64] {
        let start = output * self.n_samples;
        &self.hess[start..start + self.n_samples]
    }

    /// Sum of `(grad, hess)` over `rows` for one output.
    pub fn sum(&self, output: usize, rows: &[usize]) -> (f64, f64) {
        let (g, h) = (self.output_grads(output), self.output_hess(output));
        rows.iter()
            .fold((0.0, 0.0), |(sg, sh), &r| (sg + g[r], sh + h[r]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_major_slices() {
        let mut buffer = Gradients::new(3, 2);
        for s in 0..3 {
            buffer.set(s, 0, s as f64, 1.0);
            buffer.set(s, 1, -(s as f64), 2.0);
        }
        assert_eq!(buffer.output_grads(0), &[0.0, 1.0, 2.0]);
        assert_eq!(buffer.output_grads(1), &[0.0, -1.0, -2.0]);
        assert_eq!(buffer.output_hess(1), &[2.0, 2.0, 2.0]);
    }

    #[test]
    fn sum_over_rows() {
        let mut buffer = Gradients::new(4, 1);
        for s in 0..4 {
            buffer.set(s, 0, s as f64, 0.5);
        }
        assert_eq!(buffer.sum(0, &[1, 3, 3]), (7.0, 1.5));
    }
}
