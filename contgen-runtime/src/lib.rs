//! contgen runtime: the generation pipeline
//!
//! [`Pipeline`] owns a model and a tokenizer and drives dataset records
//! through encode → sample → post-process → track, checkpointing results
//! incrementally.
//!
//! ```text
//! Pipeline<M, T>             ← records in, JSONL out
//!   ├── PrefixBatcher<T>     ← prefix → EncodedBatch (context budgeting)
//!   ├── SamplingGenerator<M> ← batch → continuation tokens
//!   └── IncrementalWriter    ← periodic full-buffer checkpoint
//! ```

mod batcher;
mod generator;
mod pipeline;
mod writer;

pub use batcher::PrefixBatcher;
pub use generator::SamplingGenerator;
pub use pipeline::{Pipeline, RunOptions, RunSummary};
pub use writer::{shard_output_path, IncrementalWriter, FLUSH_INTERVAL};
