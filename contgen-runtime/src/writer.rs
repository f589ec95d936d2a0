//! Incremental JSONL checkpointing
//!
//! The result buffer is rewritten to disk in full at every flush, so the
//! file on disk is always a complete, self-consistent checkpoint of the
//! run so far. Data loss on interruption is bounded by the flush interval.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use contgen::{GenerationResult, Result};

/// Processed records between periodic flushes.
pub const FLUSH_INTERVAL: usize = 100;

/// Writes the accumulated result buffer to disk, in full, at every flush.
///
/// Each flush serializes one JSON object per line and goes through a temp
/// file renamed over the target, so an interrupted flush leaves the
/// previous checkpoint intact rather than a half-written file.
pub struct IncrementalWriter {
    path: PathBuf,
}

impl IncrementalWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the full result buffer, overwriting the destination.
    ///
    /// # Errors
    /// Returns an error on serialization or file I/O failure.
    pub fn flush(&self, results: &[GenerationResult]) -> Result<()> {
        // Append rather than replace the extension: shard outputs like
        // `out.jsonl.shard_2` must not collide on a shared tmp name.
        let mut tmp_name = self.path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        let mut file = fs::File::create(&tmp)?;
        for result in results {
            serde_json::to_writer(&mut file, result)?;
            file.write_all(b"\n")?;
        }
        file.flush()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Output path for one shard of a multi-shard run.
///
/// Single-shard runs write to `path` unchanged; sharded runs append a
/// `.shard_<index>` suffix so independent workers never share a file.
#[must_use]
pub fn shard_output_path(path: &Path, shard_count: usize, shard_index: usize) -> PathBuf {
    if shard_count > 1 {
        let mut name = path.as_os_str().to_os_string();
        name.push(format!(".shard_{shard_index}"));
        PathBuf::from(name)
    } else {
        path.to_path_buf()
    }
}
