//! llama.cpp backend for contgen
//!
//! Implements [`contgen::CausalModel`] and [`contgen::Tokenizer`] over a
//! GGUF model via `llama-cpp-2`. The harness stays outside the sampling
//! algorithms: selectors are forwarded as a llama.cpp sampler chain, and
//! unset selectors are simply never added to the chain, so the backend
//! sees no placeholder values.

use std::num::NonZeroU32;
use std::path::Path;
use std::sync::Arc;

use llama_cpp_2::context::params::LlamaContextParams;
use llama_cpp_2::llama_backend::LlamaBackend;
use llama_cpp_2::llama_batch::LlamaBatch;
use llama_cpp_2::model::params::LlamaModelParams;
use llama_cpp_2::model::{AddBos, LlamaModel, Special};
use llama_cpp_2::sampling::LlamaSampler;
use llama_cpp_2::token::LlamaToken;

use contgen::{CausalModel, EncodedBatch, Error, GenerationConfig, ModelConfig, Result};

/// A GGUF model loaded through llama.cpp.
///
/// The model weights are loaded once for the lifetime of the run. Each
/// generation call creates a fresh context sized to prompt + reservation,
/// which also resets the KV state between records.
pub struct LlamaCppModel {
    backend: LlamaBackend,
    model: Arc<LlamaModel>,
    config: ModelConfig,
}

impl LlamaCppModel {
    /// Load a model from a GGUF file.
    ///
    /// # Errors
    /// Returns an error if the backend cannot initialize or the file
    /// cannot be loaded.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let backend = LlamaBackend::init().map_err(|e| Error::Generation(e.to_string()))?;
        let params = LlamaModelParams::default();
        let model = LlamaModel::load_from_file(&backend, path.as_ref(), &params)
            .map_err(|e| Error::Generation(e.to_string()))?;

        #[allow(clippy::cast_sign_loss)]
        let config = ModelConfig {
            context_window: model.n_ctx_train() as usize,
            eos_token_id: model.token_eos().0 as u32,
        };

        Ok(Self {
            backend,
            model: Arc::new(model),
            config,
        })
    }

    /// Tokenizer over this model's GGUF-embedded vocabulary.
    #[must_use]
    pub fn tokenizer(&self) -> LlamaCppTokenizer {
        LlamaCppTokenizer {
            model: Arc::clone(&self.model),
        }
    }

    /// Sample one continuation of `prompt`, returning the full sequence
    /// (prompt + new tokens).
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn sample_one(&self, prompt: &[u32], config: &GenerationConfig, seed: u64) -> Result<Vec<u32>> {
        if prompt.is_empty() {
            return Err(Error::Generation("cannot continue an empty prefix".into()));
        }

        let n_ctx = (prompt.len() + config.max_new_tokens).min(self.config.context_window);
        let ctx_params = LlamaContextParams::default().with_n_ctx(NonZeroU32::new(n_ctx as u32));
        let mut ctx = self
            .model
            .new_context(&self.backend, ctx_params)
            .map_err(|e| Error::Generation(e.to_string()))?;

        let mut batch = LlamaBatch::new(n_ctx, 1);
        let last = prompt.len() - 1;
        for (i, &id) in prompt.iter().enumerate() {
            batch
                .add(LlamaToken(id as i32), i as i32, &[0], i == last)
                .map_err(|e| Error::Generation(e.to_string()))?;
        }
        ctx.decode(&mut batch)
            .map_err(|e| Error::Generation(e.to_string()))?;

        let mut sampler = build_sampler(config, seed);
        let mut tokens: Vec<u32> = prompt.to_vec();
        let mut n_cur = prompt.len() as i32;

        for _ in 0..config.max_new_tokens {
            let token = sampler.sample(&ctx, batch.n_tokens() - 1);
            sampler.accept(token);

            if self.model.is_eog_token(token) {
                break;
            }
            tokens.push(token.0 as u32);

            batch.clear();
            batch
                .add(token, n_cur, &[0], true)
                .map_err(|e| Error::Generation(e.to_string()))?;
            n_cur += 1;
            ctx.decode(&mut batch)
                .map_err(|e| Error::Generation(e.to_string()))?;
        }

        Ok(tokens)
    }
}

/// Build the sampler chain for one call.
///
/// Only selectors that are set join the chain; with none set, the chain is
/// the seeded distribution sampler alone (pure ancestral sampling from the
/// full distribution).
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn build_sampler(config: &GenerationConfig, seed: u64) -> LlamaSampler {
    let mut chain = Vec::new();
    if let Some(top_k) = config.top_k {
        chain.push(LlamaSampler::top_k(top_k as i32));
    }
    if let Some(top_p) = config.top_p {
        chain.push(LlamaSampler::top_p(top_p, 1));
    }
    if let Some(typical_p) = config.typical_p {
        chain.push(LlamaSampler::typical(typical_p, 1));
    }
    chain.push(LlamaSampler::dist(seed as u32));
    LlamaSampler::chain_simple(chain)
}

impl CausalModel for LlamaCppModel {
    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn generate(
        &mut self,
        batch: &EncodedBatch,
        config: &GenerationConfig,
        seed: u64,
    ) -> Result<Vec<Vec<u32>>> {
        let mut sequences = Vec::with_capacity(batch.len() * config.sample_count);
        for row in 0..batch.len() {
            let prompt = batch.row(row);
            for sample in 0..config.sample_count {
                // Distinct stream per sample; the per-call seed itself comes
                // from the harness's entropy-phase RNG.
                let call_seed = seed.wrapping_add(sample as u64);
                sequences.push(self.sample_one(prompt, config, call_seed)?);
            }
        }
        Ok(sequences)
    }
}

/// Tokenizer over the GGUF-embedded vocabulary.
pub struct LlamaCppTokenizer {
    model: Arc<LlamaModel>,
}

impl contgen::Tokenizer for LlamaCppTokenizer {
    #[allow(clippy::cast_sign_loss)]
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let tokens = self
            .model
            .str_to_token(text, AddBos::Never)
            .map_err(|e| Error::Tokenizer(e.to_string()))?;
        Ok(tokens.into_iter().map(|t| t.0 as u32).collect())
    }

    #[allow(clippy::cast_possible_wrap)]
    fn decode(&self, ids: &[u32]) -> Result<String> {
        let mut bytes = Vec::new();
        for &id in ids {
            let token = LlamaToken(id as i32);
            if self.model.is_eog_token(token) || token == self.model.token_bos() {
                continue;
            }
            bytes.extend(
                self.model
                    .token_to_bytes(token, Special::Tokenize)
                    .map_err(|e| Error::Tokenizer(e.to_string()))?,
            );
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    #[allow(clippy::cast_sign_loss)]
    fn pad_token_id(&self) -> u32 {
        // GGUF vocabularies rarely declare a pad token; EOS stands in.
        self.model.token_eos().0 as u32
    }
}

#[cfg(test)]
mod tests {
    // Tests require a GGUF model file, so we skip them in CI
}
