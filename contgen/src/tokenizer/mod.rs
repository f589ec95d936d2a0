//! Tokenizer integration
//!
//! Defines the [`Tokenizer`] trait and the Hugging Face implementation.

mod hf_tokenizer;

use crate::Result;

pub use hf_tokenizer::HfTokenizer;

/// Trait for tokenizers that convert between text and token IDs.
///
/// Backend crates provide concrete implementations (e.g., `HfTokenizer`,
/// or the GGUF-embedded vocabulary from the llama backend). The runtime
/// uses this trait to handle text in/out.
pub trait Tokenizer {
    /// Encode text to token IDs.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Decode token IDs to text, skipping special/control tokens.
    ///
    /// # Errors
    /// Returns an error if decoding fails.
    fn decode(&self, ids: &[u32]) -> Result<String>;

    /// Token ID used to pad batched sequences to a common length.
    fn pad_token_id(&self) -> u32;
}
