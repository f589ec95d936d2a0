//! Prefix encoding with context-window budgeting
//!
//! Converts raw prefixes into model-ready [`EncodedBatch`]es, truncating
//! each encoding so prompt plus reserved generation tokens fit the model's
//! context window.

use contgen::{EncodedBatch, Error, Result, Tokenizer};
use tracing::warn;

/// Slack below the budget at which truncation is considered to have
/// materially clipped the prefix.
const NEAR_BOUNDARY_MARGIN: usize = 3;

/// Encodes prefixes against a fixed context-window budget.
#[derive(Debug)]
pub struct PrefixBatcher<T> {
    tokenizer: T,
    context_window: usize,
}

impl<T: Tokenizer> PrefixBatcher<T> {
    pub fn new(tokenizer: T, context_window: usize) -> Self {
        Self {
            tokenizer,
            context_window,
        }
    }

    /// Get a reference to the tokenizer.
    #[must_use]
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Encode a batch of prefixes, reserving `reserved_tokens` of the
    /// context window for generation.
    ///
    /// Each row is truncated to `context_window - reserved_tokens` tokens,
    /// keeping the head of the prefix, and rows are padded to the longest
    /// in the batch. A row whose encoded length lands within 3 tokens of
    /// the budget gets a non-fatal diagnostic: truncation has materially
    /// affected it, but processing continues.
    ///
    /// # Errors
    /// Returns an error if encoding fails or if `reserved_tokens` leaves
    /// no room for any prefix token at all.
    pub fn encode(&self, prefixes: &[&str], reserved_tokens: usize) -> Result<EncodedBatch> {
        let budget = self
            .context_window
            .checked_sub(reserved_tokens)
            .filter(|b| *b > 0)
            .ok_or_else(|| {
                Error::Config(format!(
                    "reserving {reserved_tokens} tokens leaves no prefix room in a context window of {}",
                    self.context_window
                ))
            })?;

        let mut rows = Vec::with_capacity(prefixes.len());
        for prefix in prefixes {
            let mut ids = self.tokenizer.encode(prefix)?;
            ids.truncate(budget);
            if ids.len() + NEAR_BOUNDARY_MARGIN >= budget {
                warn!(
                    tokens = ids.len(),
                    budget, "prefix encoding is at the context budget, truncation likely clipped it"
                );
            }
            rows.push(ids);
        }

        Ok(EncodedBatch::from_rows(
            rows,
            self.tokenizer.pad_token_id(),
        ))
    }
}
