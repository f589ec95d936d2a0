//! Dataset partitioning for multi-shard runs
//!
//! Shards are fully independent units of work: each worker selects one
//! shard by index and runs the whole pipeline over it, with no cross-shard
//! coordination.

use crate::{Error, Result};

/// Split `records` into `shard_count` contiguous blocks.
///
/// Boundaries sit at `round(i * n / shard_count)`, so block sizes differ by
/// at most one and concatenating the shards in index order reconstructs the
/// input exactly. Shards may be empty when `shard_count > records.len()`.
/// Contiguous blocks (rather than round-robin) keep each worker's subset a
/// stable slice of the dataset.
#[must_use]
pub fn partition<T>(records: Vec<T>, shard_count: usize) -> Vec<Vec<T>> {
    if shard_count == 0 {
        return Vec::new();
    }
    let n = records.len();
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let boundary = |i: usize| -> usize { ((i * n) as f64 / shard_count as f64).round() as usize };

    let mut shards = Vec::with_capacity(shard_count);
    let mut rest = records;
    let mut taken = 0;
    for i in 0..shard_count {
        let end = boundary(i + 1);
        let tail = rest.split_off(end - taken);
        shards.push(rest);
        rest = tail;
        taken = end;
    }
    shards
}

/// Pick one shard by index.
///
/// # Errors
/// An out-of-range `shard_index` is a configuration error, not a runtime
/// fallback.
pub fn select<T>(mut shards: Vec<Vec<T>>, shard_index: usize) -> Result<Vec<T>> {
    if shard_index >= shards.len() {
        return Err(Error::Config(format!(
            "shard index {shard_index} out of range for {} shards",
            shards.len()
        )));
    }
    Ok(shards.swap_remove(shard_index))
}
