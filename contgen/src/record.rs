//! Dataset records and generation results
//!
//! The JSONL wire types: one [`Record`] per input line, one
//! [`GenerationResult`] per output line.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One dataset entry: a prefix and its reference continuations.
///
/// Immutable once loaded. `targets[0]` is the canonical ground truth;
/// `suffix`, when present, is the reference continuation used for length
/// statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    pub prefix: String,
    pub targets: Vec<String>,
    #[serde(default)]
    pub suffix: Option<String>,
}

impl Record {
    /// The canonical ground-truth continuation.
    ///
    /// # Panics
    /// Panics if the record has no targets; [`load_records`] rejects those
    /// at load time.
    #[must_use]
    pub fn ground_truth(&self) -> &str {
        &self.targets[0]
    }

    /// Reference suffix for length statistics, falling back to the ground
    /// truth when the dataset carries no separate suffix field.
    ///
    /// # Panics
    /// Panics if the record has no suffix and no targets.
    #[must_use]
    pub fn suffix_str(&self) -> &str {
        self.suffix.as_deref().unwrap_or(&self.targets[0])
    }
}

/// One output entry: the prefix plus `[ground_truth] + sampled continuations`.
///
/// Appended to the in-memory result buffer once per record and never
/// mutated or reordered afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub prefix: String,
    pub targets: Vec<String>,
}

/// Load a JSONL dataset, one [`Record`] per line.
///
/// All lines are parsed eagerly before any processing begins, so a
/// malformed line is fatal up front rather than mid-run. Blank lines are
/// skipped.
///
/// # Errors
/// Returns an error if the file cannot be read, a line is not valid JSON,
/// or a record has an empty `targets` list.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path)?;
    let mut records = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(line)?;
        if record.targets.is_empty() {
            return Err(Error::Dataset(format!(
                "line {}: record has no targets",
                line_no + 1
            )));
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn record_parses_with_and_without_suffix() {
        let with: Record =
            serde_json::from_str(r#"{"prefix": "a", "targets": ["b"], "suffix": "c"}"#).unwrap();
        assert_eq!(with.suffix_str(), "c");

        let without: Record = serde_json::from_str(r#"{"prefix": "a", "targets": ["b"]}"#).unwrap();
        assert_eq!(without.suffix_str(), "b");
        assert_eq!(without.ground_truth(), "b");
    }

    #[test]
    fn result_serializes_prefix_and_targets_only() {
        let result = GenerationResult {
            prefix: "p".into(),
            targets: vec!["t0".into(), "t1".into()],
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"prefix":"p","targets":["t0","t1"]}"#);
    }

    #[test]
    fn load_rejects_malformed_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"prefix": "a", "targets": ["b"]}}"#).unwrap();
        writeln!(file, "not json").unwrap();
        assert!(load_records(file.path()).is_err());
    }

    #[test]
    fn load_rejects_empty_targets() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"prefix": "a", "targets": []}}"#).unwrap();
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }

    #[test]
    fn load_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"prefix": "a", "targets": ["b"]}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"prefix": "c", "targets": ["d"]}}"#).unwrap();
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
    }
}
