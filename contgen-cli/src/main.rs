//! Batch continuation generation for evaluation datasets
//!
//! Usage:
//!   # one sampled continuation per prefix, ancestral sampling:
//!   contgen -m model.gguf -d data.jsonl -o out.jsonl
//!   # nucleus sampling, three samples per prefix:
//!   contgen -m model.gguf -d data.jsonl -o out.jsonl --top-p 0.9 --num-samples 3
//!   # one shard of a four-way run (writes out.jsonl.shard_2):
//!   contgen -m model.gguf -d data.jsonl -o out.jsonl --num-shards 4 --shard-index 2

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use contgen::{load_records, CausalModel, GenerationConfig, HfTokenizer, Result, Tokenizer};
use contgen_llama::{LlamaCppModel, LlamaCppTokenizer};
use contgen_runtime::{Pipeline, RunOptions};

/// Sample continuations for every prefix in a JSONL dataset.
///
/// Each input line holds a prefix and its reference continuations; each
/// output line holds the prefix, the ground truth, and the sampled
/// continuations. Results are flushed incrementally so interrupted runs
/// keep their progress.
#[derive(Parser)]
#[command(name = "contgen")]
struct Cli {
    /// Path to the GGUF model file
    #[arg(short, long)]
    model: PathBuf,

    /// Input dataset (JSONL, one record per line)
    #[arg(short, long)]
    dataset: PathBuf,

    /// Output path (JSONL; sharded runs get a .shard_<index> suffix)
    #[arg(short, long)]
    output_file: PathBuf,

    /// Hugging Face tokenizer.json to use instead of the GGUF vocabulary
    #[arg(long)]
    tokenizer: Option<PathBuf>,

    /// Stop after this many records (default: the whole dataset)
    #[arg(long, default_value_t = usize::MAX)]
    num_instances: usize,

    /// Continuations to sample per prefix
    #[arg(long, default_value_t = 1)]
    num_samples: usize,

    /// Maximum new tokens per continuation
    #[arg(long, default_value_t = 115)]
    max_new_tokens: usize,

    /// Top-k sampling selector
    #[arg(long)]
    top_k: Option<usize>,

    /// Nucleus (top-p) sampling selector
    #[arg(long)]
    top_p: Option<f32>,

    /// Typical-decoding selector
    #[arg(long)]
    typical_p: Option<f32>,

    /// Total shard count across all workers
    #[arg(long, default_value_t = 1)]
    num_shards: usize,

    /// This worker's shard index
    #[arg(long, default_value_t = 0)]
    shard_index: usize,
}

/// Either tokenizer backend, so the pipeline stays generic over one type.
enum AnyTokenizer {
    HuggingFace(HfTokenizer),
    Gguf(LlamaCppTokenizer),
}

impl Tokenizer for AnyTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        match self {
            Self::HuggingFace(t) => t.encode(text),
            Self::Gguf(t) => t.encode(text),
        }
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        match self {
            Self::HuggingFace(t) => t.decode(ids),
            Self::Gguf(t) => t.decode(ids),
        }
    }

    fn pad_token_id(&self) -> u32 {
        match self {
            Self::HuggingFace(t) => t.pad_token_id(),
            Self::Gguf(t) => t.pad_token_id(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let records = load_records(&cli.dataset)?;
    info!(
        records = records.len(),
        dataset = %cli.dataset.display(),
        "dataset loaded"
    );

    let model = LlamaCppModel::from_file(&cli.model)?;
    let tokenizer = match &cli.tokenizer {
        Some(path) => AnyTokenizer::HuggingFace(HfTokenizer::from_file(path)?),
        None => AnyTokenizer::Gguf(model.tokenizer()),
    };
    info!(
        context_window = model.config().context_window,
        model = %cli.model.display(),
        "model loaded"
    );

    let config = GenerationConfig {
        sample_count: cli.num_samples,
        max_new_tokens: cli.max_new_tokens,
        top_k: cli.top_k,
        top_p: cli.top_p,
        typical_p: cli.typical_p,
    };
    let options = RunOptions {
        num_instances: cli.num_instances,
        shard_count: cli.num_shards,
        shard_index: cli.shard_index,
        output_path: cli.output_file,
    };

    let summary = Pipeline::new(model, tokenizer, config, options)?.run(records)?;

    info!(
        processed = summary.records_processed,
        flushes = summary.flushes,
        suffix_mean = summary.stats.suffix_mean,
        generation_mean = summary.stats.generation_mean,
        output = %summary.output_path.display(),
        "run complete"
    );
    Ok(())
}
