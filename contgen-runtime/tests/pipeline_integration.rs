//! Integration tests for the generation pipeline.
//!
//! Uses mock model and tokenizer doubles so the full record → result flow
//! runs without any model weights: encoding, sampling invocation,
//! post-processing, statistics, and incremental output.

use std::fs;

use contgen::{
    CausalModel, EncodedBatch, Error, GenerationConfig, GenerationResult, ModelConfig, Record,
    Result, Tokenizer,
};
use contgen_runtime::{Pipeline, RunOptions};

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// One token per character; pad/special token is 0.
#[derive(Debug)]
struct CharTokenizer;

impl Tokenizer for CharTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(text.chars().map(u32::from).collect())
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        Ok(ids
            .iter()
            .filter(|&&id| id != 0)
            .filter_map(|&id| char::from_u32(id))
            .collect())
    }

    fn pad_token_id(&self) -> u32 {
        0
    }
}

/// Continues every prompt with a fixed string, `sample_count` times per row.
#[derive(Debug)]
struct FixedModel {
    config: ModelConfig,
    continuation: String,
}

impl FixedModel {
    fn new(continuation: &str) -> Self {
        Self {
            config: ModelConfig {
                context_window: 1024,
                eos_token_id: 0,
            },
            continuation: continuation.to_string(),
        }
    }
}

impl CausalModel for FixedModel {
    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn generate(
        &mut self,
        batch: &EncodedBatch,
        config: &GenerationConfig,
        _seed: u64,
    ) -> Result<Vec<Vec<u32>>> {
        let mut sequences = Vec::new();
        for row in 0..batch.len() {
            for _ in 0..config.sample_count {
                let mut sequence = batch.row(row).to_vec();
                sequence.extend(self.continuation.chars().map(u32::from));
                sequences.push(sequence);
            }
        }
        Ok(sequences)
    }
}

fn record(prefix: &str, target: &str) -> Record {
    Record {
        prefix: prefix.to_string(),
        targets: vec![target.to_string()],
        suffix: None,
    }
}

fn dataset(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| record(&format!("prefix {i}"), &format!("target {i}")))
        .collect()
}

fn options(output_path: std::path::PathBuf) -> RunOptions {
    RunOptions {
        num_instances: usize::MAX,
        shard_count: 1,
        shard_index: 0,
        output_path,
    }
}

fn read_results(path: &std::path::Path) -> Vec<GenerationResult> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Instance cap and result shape
// ---------------------------------------------------------------------------

#[test]
fn stops_at_num_instances() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");
    let mut opts = options(out.clone());
    opts.num_instances = 3;

    let summary = Pipeline::new(
        FixedModel::new(" The end."),
        CharTokenizer,
        GenerationConfig::default(),
        opts,
    )
    .unwrap()
    .run(dataset(10))
    .unwrap();

    assert_eq!(summary.records_processed, 3);
    assert_eq!(read_results(&out).len(), 3);
}

#[test]
fn every_result_has_one_plus_sample_count_targets() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");
    let config = GenerationConfig {
        sample_count: 3,
        ..GenerationConfig::default()
    };

    Pipeline::new(FixedModel::new(" So it goes."), CharTokenizer, config, options(out.clone()))
        .unwrap()
        .run(dataset(5))
        .unwrap();

    for result in read_results(&out) {
        assert_eq!(result.targets.len(), 4);
    }
}

#[test]
fn continuations_are_normalized_and_sentence_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");

    Pipeline::new(
        FixedModel::new("  It   works.  And then some trailing words"),
        CharTokenizer,
        GenerationConfig::default(),
        options(out.clone()),
    )
    .unwrap()
    .run(dataset(1))
    .unwrap();

    let results = read_results(&out);
    assert_eq!(results[0].targets[1], "It works.");
}

#[test]
fn ground_truth_stays_first() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");

    Pipeline::new(
        FixedModel::new(" generated."),
        CharTokenizer,
        GenerationConfig::default(),
        options(out.clone()),
    )
    .unwrap()
    .run(vec![record("p", "the reference")])
    .unwrap();

    let results = read_results(&out);
    assert_eq!(results[0].targets[0], "the reference");
}

// ---------------------------------------------------------------------------
// Flush cadence
// ---------------------------------------------------------------------------

#[test]
fn short_run_flushes_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");

    let summary = Pipeline::new(
        FixedModel::new(" x."),
        CharTokenizer,
        GenerationConfig::default(),
        options(out),
    )
    .unwrap()
    .run(dataset(99))
    .unwrap();

    assert_eq!(summary.flushes, 1);
}

#[test]
fn hundred_fifty_records_flush_twice() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");

    let summary = Pipeline::new(
        FixedModel::new(" x."),
        CharTokenizer,
        GenerationConfig::default(),
        options(out.clone()),
    )
    .unwrap()
    .run(dataset(150))
    .unwrap();

    assert_eq!(summary.records_processed, 150);
    assert_eq!(summary.flushes, 2);
    assert_eq!(read_results(&out).len(), 150);
}

// ---------------------------------------------------------------------------
// Sharding
// ---------------------------------------------------------------------------

#[test]
fn shards_cover_the_dataset_without_overlap() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");
    let records = dataset(17);

    let mut seen: Vec<String> = Vec::new();
    for shard_index in 0..4 {
        let opts = RunOptions {
            num_instances: usize::MAX,
            shard_count: 4,
            shard_index,
            output_path: out.clone(),
        };
        let summary = Pipeline::new(
            FixedModel::new(" x."),
            CharTokenizer,
            GenerationConfig::default(),
            opts,
        )
        .unwrap()
        .run(records.clone())
        .unwrap();

        let shard_path = dir.path().join(format!("out.jsonl.shard_{shard_index}"));
        assert_eq!(summary.output_path, shard_path);
        for result in read_results(&shard_path) {
            seen.push(result.prefix);
        }
    }

    seen.sort();
    let mut expected: Vec<String> = records.iter().map(|r| r.prefix.clone()).collect();
    expected.sort();
    assert_eq!(seen, expected);
}

#[test]
fn out_of_range_shard_index_is_rejected_up_front() {
    let dir = tempfile::tempdir().unwrap();
    let opts = RunOptions {
        num_instances: usize::MAX,
        shard_count: 2,
        shard_index: 2,
        output_path: dir.path().join("out.jsonl"),
    };
    let err = Pipeline::new(
        FixedModel::new(" x."),
        CharTokenizer,
        GenerationConfig::default(),
        opts,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

// ---------------------------------------------------------------------------
// Reproducible order, statistics
// ---------------------------------------------------------------------------

#[test]
fn processing_order_is_reproducible_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.jsonl");
    let second = dir.path().join("second.jsonl");

    for out in [&first, &second] {
        Pipeline::new(
            FixedModel::new(" x."),
            CharTokenizer,
            GenerationConfig::default(),
            options(out.clone()),
        )
        .unwrap()
        .run(dataset(30))
        .unwrap();
    }

    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn suffix_stats_fall_back_to_ground_truth() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jsonl");

    let with_suffix = Record {
        prefix: "p".into(),
        targets: vec!["one two three four".into()],
        suffix: Some("one two".into()),
    };

    let summary = Pipeline::new(
        FixedModel::new(" x."),
        CharTokenizer,
        GenerationConfig::default(),
        options(out.clone()),
    )
    .unwrap()
    .run(vec![with_suffix, record("q", "five six seven")])
    .unwrap();

    // First record counts its suffix (2 words), second its ground truth (3).
    assert_eq!(summary.stats.suffix_count, 2);
    assert_eq!(summary.stats.suffix_mean, 2.5);
    assert_eq!(summary.stats.generation_count, 2);
}
