//! Encoded prefix batches

/// A model-ready batch of encoded prefixes.
///
/// Rows are padded to the longest sequence in the batch; `lengths` keeps
/// each row's true (unpadded) token count so callers can slice prompt
/// tokens off generated sequences. The reference flow uses batch size 1,
/// but the type supports arbitrary batch sizes.
#[derive(Debug, Clone)]
pub struct EncodedBatch {
    input_ids: Vec<Vec<u32>>,
    lengths: Vec<usize>,
}

impl EncodedBatch {
    /// Build a batch from unpadded rows, padding each to the longest row
    /// with `pad_id`.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<u32>>, pad_id: u32) -> Self {
        let lengths: Vec<usize> = rows.iter().map(Vec::len).collect();
        let max_len = lengths.iter().copied().max().unwrap_or(0);
        let input_ids = rows
            .into_iter()
            .map(|mut row| {
                row.resize(max_len, pad_id);
                row
            })
            .collect();
        Self { input_ids, lengths }
    }

    /// Number of sequences in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    /// Whether the batch holds no sequences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// True (unpadded) token count of row `index`.
    #[must_use]
    pub fn length(&self, index: usize) -> usize {
        self.lengths[index]
    }

    /// Unpadded view of row `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> &[u32] {
        &self.input_ids[index][..self.lengths[index]]
    }

    /// The padded rows, all the same width.
    #[must_use]
    pub fn padded_rows(&self) -> &[Vec<u32>] {
        &self.input_ids
    }
}
