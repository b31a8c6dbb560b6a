// ============================================================
// Layer 3 — Vocabulary and Embedding Matrix
// ============================================================
// The two lookup tables built from the pretrained vector file.
//
// Index layout (shared by both tables):
//
//   0        → padding       (zero vector)
//   1        → unknown word  (zero vector)
//   2, 3, …  → words in the order they appear in the file
//
// Both are built once by the embedding loader and only read
// afterwards, so they hand out shared references.

use std::collections::HashMap;

/// Index used to pad sequences up to the fixed length
pub const PAD_INDEX: u32 = 0;

/// Index every out-of-vocabulary word maps to
pub const UNK_INDEX: u32 = 1;

/// First index handed to a real word
pub const FIRST_WORD_INDEX: u32 = 2;

/// Word ↔ index mapping.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    word_index: HashMap<String, u32>,
    /// Indices handed out so far, reserved ones included
    rows:       usize,
}

impl Vocabulary {
    /// A vocabulary holding only the two reserved entries
    pub fn new() -> Self {
        Self {
            word_index: HashMap::new(),
            rows:       FIRST_WORD_INDEX as usize,
        }
    }

    /// Append a word and return the index it was given.
    ///
    /// A word seen again is re-pointed at the new index; the old
    /// index stays allocated so indices remain contiguous.
    pub fn push(&mut self, word: impl Into<String>) -> u32 {
        let index = self.rows as u32;
        self.rows += 1;
        self.word_index.insert(word.into(), index);
        index
    }

    /// Index for `word`, or UNK_INDEX when it is not known
    pub fn lookup(&self, word: &str) -> u32 {
        self.word_index.get(word).copied().unwrap_or(UNK_INDEX)
    }

    /// Number of rows the embedding matrix needs (reserved rows included)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of distinct words (reserved entries excluded)
    pub fn word_count(&self) -> usize {
        self.word_index.len()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

/// Dense row-major matrix of word vectors, one row per vocabulary index.
#[derive(Debug, Clone)]
pub struct EmbeddingMatrix {
    values: Vec<f32>,
    rows:   usize,
    dim:    usize,
}

impl EmbeddingMatrix {
    /// Start a matrix with the two reserved zero rows
    pub fn new(dim: usize) -> Self {
        Self {
            values: vec![0.0; 2 * dim],
            rows:   2,
            dim,
        }
    }

    /// Append one row. Callers check the length first.
    pub fn push_row(&mut self, row: &[f32]) {
        debug_assert_eq!(row.len(), self.dim);
        self.values.extend_from_slice(row);
        self.rows += 1;
    }

    pub fn rows(&self) -> usize { self.rows }

    pub fn dim(&self) -> usize { self.dim }

    /// Flat row-major values, handed over without a copy
    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

#[cfg(test)]
impl EmbeddingMatrix {
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.dim;
        Some(&self.values[start..start + self.dim])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_entries() {
        let v = Vocabulary::new();
        assert_eq!(v.rows(), FIRST_WORD_INDEX as usize);
        assert_eq!(v.word_count(), 0);
        assert_eq!(v.lookup(""), UNK_INDEX);
        assert_ne!(v.lookup("x"), PAD_INDEX);
    }

    #[test]
    fn test_indices_start_at_two_and_are_contiguous() {
        let mut v = Vocabulary::new();
        assert_eq!(v.push("good"), 2);
        assert_eq!(v.push("movie"), 3);
        assert_eq!(v.lookup("good"), 2);
        assert_eq!(v.lookup("movie"), 3);
        assert_eq!(v.rows(), 4);
    }

    #[test]
    fn test_absent_word_maps_to_unknown() {
        let v = Vocabulary::new();
        assert_eq!(v.lookup("nothing"), UNK_INDEX);
    }

    #[test]
    fn test_repeated_word_takes_latest_index() {
        let mut v = Vocabulary::new();
        v.push("a");
        v.push("a");
        assert_eq!(v.lookup("a"), 3);
        assert_eq!(v.rows(), 4);
        assert_eq!(v.word_count(), 1);
    }

    #[test]
    fn test_matrix_reserved_rows_are_zero() {
        let mut m = EmbeddingMatrix::new(3);
        m.push_row(&[1.0, 2.0, 3.0]);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.row(0), Some(&[0.0, 0.0, 0.0][..]));
        assert_eq!(m.row(1), Some(&[0.0, 0.0, 0.0][..]));
        assert_eq!(m.row(2), Some(&[1.0, 2.0, 3.0][..]));
        assert!(m.row(3).is_none());
    }
}
