//! Seeded train/test partitioning of row indices.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Row indices for each side of a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Number of test rows for `n_rows` at `test_fraction`: rounded up, like the
/// usual ML toolkits do.
pub fn test_size(n_rows: usize, test_fraction: f32) -> usize {
    let fraction = test_fraction.clamp(0.0, 1.0) as f64;
    let raw = n_rows as f64 * fraction;
    // f32 fractions like 0.2 widen to 0.2000000030; don't let that round 20.0 up to 21.
    let rounded = raw.round();
    let size = if (raw - rounded).abs() < 1e-6 {
        rounded
    } else {
        raw.ceil()
    };
    (size as usize).min(n_rows)
}

/// Shuffle `0..n_rows` with `seed` and cut off the first `test_size` rows as the test set.
pub fn train_test_indices(n_rows: usize, test_fraction: f32, seed: u64) -> TrainTestSplit {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..n_rows).collect();
    order.shuffle(&mut rng);
    let train = order.split_off(test_size(n_rows, test_fraction));
    TrainTestSplit { train, test: order }
}
