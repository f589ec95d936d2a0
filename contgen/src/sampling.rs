//! Sampling configuration for continuation generation

use crate::{Error, Result};

/// Parameters governing one generation call.
///
/// The selector fields mirror the underlying model capability: whichever of
/// `top_k` / `top_p` / `typical_p` are set get forwarded, and the selectors
/// are mutually combinable (the capability decides precedence). Unset
/// selectors are omitted entirely rather than passed as placeholder values,
/// since a default sentinel alongside a real selector can silently change
/// sampling behavior. With all three unset, sampling is pure ancestral
/// sampling from the full distribution.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Continuations to sample per prefix.
    pub sample_count: usize,
    /// Maximum number of new tokens per continuation.
    pub max_new_tokens: usize,
    /// Top-k selector: only the k most probable tokens are eligible.
    pub top_k: Option<usize>,
    /// Nucleus selector: smallest token set with cumulative mass >= p.
    pub top_p: Option<f32>,
    /// Typical-decoding selector.
    pub typical_p: Option<f32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            sample_count: 1,
            max_new_tokens: 115,
            top_k: None,
            top_p: None,
            typical_p: None,
        }
    }
}

impl GenerationConfig {
    /// Check the structural bounds. Selector values themselves are not
    /// range-checked here; the model capability owns their semantics.
    ///
    /// # Errors
    /// Returns an error if `sample_count` or `max_new_tokens` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.sample_count == 0 {
            return Err(Error::Config("sample_count must be at least 1".into()));
        }
        if self.max_new_tokens == 0 {
            return Err(Error::Config("max_new_tokens must be at least 1".into()));
        }
        Ok(())
    }
}
