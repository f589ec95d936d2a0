//! Sampling invocation
//!
//! Bridges the pipeline to the model's sampling capability: hands an
//! encoded batch to [`CausalModel::generate`] and slices each returned
//! sequence at its row's true prefix length, so only raw continuation
//! tokens flow onward.

use contgen::{CausalModel, EncodedBatch, GenerationConfig, ModelConfig, Result};
use rand::rngs::StdRng;
use rand::Rng;

/// Drives the model's continuation capability.
///
/// The RNG is the entropy-phase generator handed back by the shuffler; it
/// seeds each sampling call, so generation is not deterministic
/// run-over-run even though the record order is.
pub struct SamplingGenerator<M> {
    model: M,
    rng: StdRng,
}

impl<M: CausalModel> SamplingGenerator<M> {
    pub fn new(model: M, rng: StdRng) -> Self {
        Self { model, rng }
    }

    /// Get the model configuration.
    #[must_use]
    pub fn model_config(&self) -> &ModelConfig {
        self.model.config()
    }

    /// Sample `config.sample_count` continuations per batch row.
    ///
    /// Returned sequences contain continuation tokens only; the prompt is
    /// sliced off at each row's unpadded length. Ordering is row-major:
    /// row `r`'s samples occupy `r * sample_count .. (r + 1) * sample_count`.
    ///
    /// # Errors
    /// Propagates backend failures unretried; the caller's last flush is
    /// the recovery point.
    pub fn generate(
        &mut self,
        batch: &EncodedBatch,
        config: &GenerationConfig,
    ) -> Result<Vec<Vec<u32>>> {
        let seed = self.rng.gen();
        let sequences = self.model.generate(batch, config, seed)?;

        let mut continuations = Vec::with_capacity(sequences.len());
        for (i, mut sequence) in sequences.into_iter().enumerate() {
            let row = i / config.sample_count;
            let prefix_len = batch.length(row).min(sequence.len());
            continuations.push(sequence.split_off(prefix_len));
        }
        Ok(continuations)
    }
}
