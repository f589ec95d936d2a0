//! The generation pipeline driver
//!
//! Owns a whole run: partition, shuffle, then the per-record loop of
//! encode → sample → post-process → track, with periodic flushes and one
//! unconditional final flush. There are no retries between stages; an
//! unhandled failure aborts the run and the last flush on disk stands as
//! the recovery point.

use std::path::PathBuf;

use contgen::postprocess::{normalize, truncate_to_sentence};
use contgen::stats::word_count;
use contgen::{
    partition, shuffle, CausalModel, Error, GenerationConfig, GenerationResult, Record, Result,
    RunningStats, StatsSummary, Tokenizer,
};
use tracing::info;

use crate::batcher::PrefixBatcher;
use crate::generator::SamplingGenerator;
use crate::writer::{shard_output_path, IncrementalWriter, FLUSH_INTERVAL};

/// Run-level options beyond the sampling config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Stop after this many records, independent of dataset length.
    pub num_instances: usize,
    /// Total shard count across all workers.
    pub shard_count: usize,
    /// This worker's shard index.
    pub shard_index: usize,
    /// Output path; sharded runs get a `.shard_<index>` suffix.
    pub output_path: PathBuf,
}

/// What a completed run did.
#[derive(Debug)]
pub struct RunSummary {
    /// Records processed (at most `num_instances`).
    pub records_processed: usize,
    /// Flushes performed, the final one included.
    pub flushes: usize,
    /// Final length statistics.
    pub stats: StatsSummary,
    /// Where results were written.
    pub output_path: PathBuf,
}

/// The generation pipeline.
///
/// Combines a model with a tokenizer and drives dataset records through
/// one synchronous, sequential pass. Each `Pipeline` instance serves one
/// run; horizontal scale-out happens through independent shard processes.
#[derive(Debug)]
pub struct Pipeline<M, T> {
    model: M,
    batcher: PrefixBatcher<T>,
    config: GenerationConfig,
    options: RunOptions,
}

impl<M: CausalModel, T: Tokenizer> Pipeline<M, T> {
    /// Create a pipeline from a model, a tokenizer, and the run options.
    ///
    /// # Errors
    /// Returns a configuration error if the sampling config is structurally
    /// invalid or the shard index is out of range for the shard count.
    pub fn new(
        model: M,
        tokenizer: T,
        config: GenerationConfig,
        options: RunOptions,
    ) -> Result<Self> {
        config.validate()?;
        if options.shard_count == 0 {
            return Err(Error::Config("shard count must be at least 1".into()));
        }
        if options.shard_index >= options.shard_count {
            return Err(Error::Config(format!(
                "shard index {} out of range for {} shards",
                options.shard_index, options.shard_count
            )));
        }

        let context_window = model.config().context_window;
        let batcher = PrefixBatcher::new(tokenizer, context_window);
        Ok(Self {
            model,
            batcher,
            config,
            options,
        })
    }

    /// Run the pipeline over `records`, consuming the pipeline.
    ///
    /// Selects this worker's shard, shuffles it with the fixed seed, and
    /// processes records until the shard or `num_instances` is exhausted.
    /// The result buffer is flushed every [`FLUSH_INTERVAL`] processed
    /// records and once more after the final one.
    ///
    /// # Errors
    /// Any failure inside the loop aborts the run; the most recent flush
    /// remains on disk as the checkpoint.
    pub fn run(self, records: Vec<Record>) -> Result<RunSummary> {
        let Self {
            model,
            batcher,
            config,
            options,
        } = self;

        let shards = partition::partition(records, options.shard_count);
        let mut records = partition::select(shards, options.shard_index)?;
        let output_path = shard_output_path(&options.output_path, options.shard_count, options.shard_index);
        let writer = IncrementalWriter::new(output_path.clone());

        // Fixed-seed shuffle for reproducible order, entropy RNG for sampling.
        let rng = shuffle::shuffle(&mut records, shuffle::SHUFFLE_SEED);
        let mut generator = SamplingGenerator::new(model, rng);

        let mut stats = RunningStats::new();
        let mut results: Vec<GenerationResult> = Vec::new();
        let mut flushes = 0;

        for record in &records {
            if results.len() >= options.num_instances {
                break;
            }

            let batch = batcher.encode(&[record.prefix.as_str()], config.max_new_tokens)?;
            let continuations = generator.generate(&batch, &config)?;

            stats.record_suffix_len(word_count(record.suffix_str()));

            let mut targets = Vec::with_capacity(1 + config.sample_count);
            targets.push(record.ground_truth().to_string());
            for tokens in &continuations {
                let text = batcher.tokenizer().decode(tokens)?;
                let text = truncate_to_sentence(&normalize(&text));
                stats.record_generation_len(word_count(&text));
                targets.push(text);
            }

            results.push(GenerationResult {
                prefix: record.prefix.clone(),
                targets,
            });

            if results.len() % FLUSH_INTERVAL == 0 {
                writer.flush(&results)?;
                flushes += 1;
                let summary = stats.summarize();
                info!(
                    processed = results.len(),
                    suffix_mean = summary.suffix_mean,
                    generation_mean = summary.generation_mean,
                    "checkpoint flushed"
                );
            }
        }

        writer.flush(&results)?;
        flushes += 1;

        Ok(RunSummary {
            records_processed: results.len(),
            flushes,
            stats: stats.summarize(),
            output_path,
        })
    }
}
