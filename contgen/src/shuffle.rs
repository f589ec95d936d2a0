//! Deterministic dataset shuffling
//!
//! Dataset order must be reproducible across runs and shards (re-running a
//! shard reproduces the same subset), while the sampling that follows must
//! not be deterministic run-over-run. The shuffle therefore runs in two
//! phases on an explicit RNG handle: a fixed-seed shuffle, then a fresh
//! entropy-seeded generator handed back to the caller for sampling. No
//! ambient global RNG state is touched.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Fixed seed for the reproducible shuffle phase.
///
/// Carried over from the corpus this harness was built for. Changing it
/// changes which records land in the first `num_instances` of every run.
pub const SHUFFLE_SEED: u64 = 484;

/// Shuffle `records` in place with `seed`, then return a fresh
/// entropy-seeded RNG for the sampling that follows.
///
/// Two shuffles with the same seed on the same input produce the same
/// permutation; the returned RNG is unrelated to `seed`.
pub fn shuffle<T>(records: &mut [T], seed: u64) -> StdRng {
    let mut rng = StdRng::seed_from_u64(seed);
    records.shuffle(&mut rng);
    StdRng::from_entropy()
}
