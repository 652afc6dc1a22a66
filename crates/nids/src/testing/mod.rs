//! Synthetic data for tests, benchmarks and the quality report.
//!
//! Every generator is seeded and deterministic.

pub mod data;
