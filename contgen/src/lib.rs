//! contgen: batch text-continuation harness
//!
//! This crate provides the core types and traits for generating sampled
//! continuations of dataset prefixes with a causal language model, to
//! produce comparison data against ground-truth references. The pipeline
//! lives in `contgen-runtime`; backend implementations (llama.cpp, etc.)
//! are in separate crates.

pub mod batch;
pub mod error;
pub mod model;
pub mod partition;
pub mod postprocess;
pub mod record;
pub mod sampling;
pub mod shuffle;
pub mod stats;
pub mod tokenizer;

pub use batch::EncodedBatch;
pub use error::{Error, Result};
pub use model::{CausalModel, ModelConfig};
pub use record::{load_records, GenerationResult, Record};
pub use sampling::GenerationConfig;
pub use shuffle::SHUFFLE_SEED;
pub use stats::{RunningStats, StatsSummary};
pub use tokenizer::{HfTokenizer, Tokenizer};
