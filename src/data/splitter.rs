// ============================================================
// Layer 4 — Dataset Splitter
// ============================================================
// Two different splits happen in a training run:
//
//   1. train / test — a seeded random partition of all rows.
//      The test partition is never seen by the preprocessor fit
//      or the optimiser, only by the final evaluation.
//
//   2. fit / validation — the LAST fraction of the (already
//      shuffled) training partition is held back to monitor
//      generalisation every epoch. No shuffle here; rows are
//      simply cut off the end.
//
// The shuffle is Fisher-Yates via rand::seq::SliceRandom on a
// StdRng seeded from the config, so the same seed always gives
// the same partition.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle with `seed` and split into (train, test).
///
/// The test side gets `ceil(n * test_fraction)` rows, so any
/// non-zero fraction of a non-empty set yields at least one.
pub fn split_train_test<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total  = samples.len();
    let n_test = ((total as f64) * test_fraction).ceil() as usize;
    let n_test = n_test.min(total);

    let test = samples.split_off(total - n_test);

    tracing::debug!(
        "Train/test split (seed {}): {} train, {} test",
        seed,
        samples.len(),
        test.len(),
    );

    (samples, test)
}

/// Cut the last `holdout_fraction` off `samples` without shuffling.
/// Returns (kept, held_out).
pub fn split_tail<T>(mut samples: Vec<T>, holdout_fraction: f64) -> (Vec<T>, Vec<T>) {
    let total    = samples.len();
    let split_at = ((total as f64) * (1.0 - holdout_fraction)) as usize;
    let split_at = split_at.min(total);
    let held_out = samples.split_off(split_at);
    (samples, held_out)
}
