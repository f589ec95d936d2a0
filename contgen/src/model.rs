//! Model trait for continuation generation
//!
//! Defines the interface the pipeline drives. Backend crates provide the
//! concrete model; the harness never looks inside the sampling capability,
//! it only selects and parameterizes it.

use crate::batch::EncodedBatch;
use crate::sampling::GenerationConfig;
use crate::Result;

/// Configuration the runtime needs for context-window budgeting.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Maximum total token count (prompt + generated) per call.
    pub context_window: usize,
    /// End-of-sequence token ID.
    pub eos_token_id: u32,
}

/// Trait for causal language models that can continue encoded prefixes.
///
/// `generate` returns `config.sample_count` full token sequences (prompt
/// included) per batch row, ordered row-major: the samples for row `r`
/// occupy indices `r * sample_count .. (r + 1) * sample_count`. Sampling
/// is probabilistic; `seed` seeds the backend's sampler for one call and
/// carries no determinism guarantee across backends.
pub trait CausalModel {
    /// Get the model configuration needed for context budgeting.
    fn config(&self) -> &ModelConfig;

    /// Sample continuations for every row of `batch`.
    ///
    /// Selectors left unset in `config` must not reach the underlying
    /// sampling capability as placeholder values.
    ///
    /// # Errors
    /// Returns an error if the underlying capability fails. The harness
    /// does not catch or retry; the error aborts the run.
    fn generate(
        &mut self,
        batch: &EncodedBatch,
        config: &GenerationConfig,
        seed: u64,
    ) -> Result<Vec<Vec<u32>>>;
}
