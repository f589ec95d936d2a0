//! Hugging Face tokenizer using the `tokenizers` crate

use std::path::Path;

use crate::{Error, Result};

/// Wrapper around a `tokenizer.json` fast tokenizer.
pub struct HfTokenizer {
    tokenizer: tokenizers::Tokenizer,
    pad_token_id: u32,
}

impl HfTokenizer {
    /// Load a tokenizer from a `tokenizer.json` file.
    ///
    /// The pad token falls back to the EOS token when the vocabulary
    /// declares no dedicated pad token, the usual causal-LM arrangement.
    ///
    /// # Errors
    /// Returns an error if the tokenizer cannot be loaded.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let tokenizer = tokenizers::Tokenizer::from_file(path)
            .map_err(|e| Error::Tokenizer(e.to_string()))?;

        let pad_token_id = ["<pad>", "<|endoftext|>", "<|end_of_text|>", "</s>"]
            .iter()
            .find_map(|t| tokenizer.token_to_id(t))
            .unwrap_or(0);

        Ok(Self {
            tokenizer,
            pad_token_id,
        })
    }

    /// Get the vocabulary size.
    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }
}

impl crate::Tokenizer for HfTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| Error::Tokenizer(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        self.tokenizer
            .decode(ids, true)
            .map_err(|e| Error::Tokenizer(e.to_string()))
    }

    fn pad_token_id(&self) -> u32 {
        self.pad_token_id
    }
}
