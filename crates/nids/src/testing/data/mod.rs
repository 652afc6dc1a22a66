use rand::prelude::*;

use crate::data::{Dataset, Sample};

/// Uniform jitter around fixed class centers.
///
/// Produces `per_class` samples for every `(label, center)` pair, interleaved
/// so that any prefix of the dataset is close to balanced. Each feature is
/// `center[j] + u` with `u` uniform in `[-spread, spread]`.
pub fn jittered_clusters(centers: &[(u32, Vec<f64>)], per_class: usize, spread: f64, seed: u64) -> Dataset {
	assert!(spread >= 0.0);
	let mut rng = StdRng::seed_from_u64(seed);
	let mut samples = Vec::with_capacity(centers.len() * per_class);
	for _ in 0..per_class {
		for (label, center) in centers {
			let features = center
				.iter()
				.map(|&c| if spread > 0.0 { c + rng.gen_range(-spread..=spread) } else { c })
				.collect();
			samples.push(Sample::new(features, *label));
		}
	}
	Dataset::new(samples)
}

/// Two balanced classes where every feature separates them.
///
/// Label `i % 2`; class 0 features are `0.2 + δ`, class 1 features `0.7 + δ`,
/// with `δ` drawn from `{0, 0.05, 0.1}`. In particular `feature[0] > 0.5`
/// holds exactly for class 1.
pub fn separable_binary(n_samples: usize, n_features: usize, seed: u64) -> Dataset {
	const JITTER: [f64; 3] = [0.0, 0.05, 0.1];
	let mut rng = StdRng::seed_from_u64(seed);
	(0..n_samples)
		.map(|i| {
			let label = (i % 2) as u32;
			let base = if label == 0 { 0.2 } else { 0.7 };
			let features = (0..n_features)
				.map(|_| base + JITTER[rng.gen_range(0..JITTER.len())])
				.collect();
			Sample::new(features, label)
		})
		.collect()
}

/// Two classes split by the sign of feature 0, with a margin.
///
/// Feature 0 is uniform in `±[margin, 1]`; the remaining features are uniform
/// noise in `[-1, 1]`. Label 1 iff feature 0 is positive.
pub fn margin_binary(n_samples: usize, n_features: usize, margin: f64, seed: u64) -> Dataset {
	assert!(n_features >= 1);
	assert!((0.0..1.0).contains(&margin));
	let mut rng = StdRng::seed_from_u64(seed);
	(0..n_samples)
		.map(|i| {
			let positive = i % 2 == 1;
			let magnitude = rng.gen_range(margin..=1.0);
			let mut features = vec![if positive { magnitude } else { -magnitude }];
			features.extend((1..n_features).map(|_| rng.gen_range(-1.0..=1.0)));
			Sample::new(features, u32::from(positive))
		})
		.collect()
}

/// Deterministic train/test split indices.
///
/// Returns `(train_idx, test_idx)`.
pub fn split_indices(rows: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
	assert!((0.0..1.0).contains(&test_fraction));
	let mut idx: Vec<usize> = (0..rows).collect();
	let mut rng = StdRng::seed_from_u64(seed);
	idx.shuffle(&mut rng);

	let test_len = ((rows as f64) * test_fraction).round() as usize;
	let test_len = test_len.min(rows);
	let (test, train) = idx.split_at(test_len);
	(train.to_vec(), test.to_vec())
}

/// Shuffled train/test split of a dataset.
pub fn train_test_split(dataset: &Dataset, test_fraction: f64, seed: u64) -> (Dataset, Dataset) {
	let (train, test) = split_indices(dataset.len(), test_fraction, seed);
	(dataset.subset(&train), dataset.subset(&test))
}
