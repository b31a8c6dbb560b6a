// ============================================================
// Layer 4 — Sequence Preprocessor
// ============================================================
// Turns raw texts into fixed-length index sequences.
//
// Steps for one text:
//   1. Lowercase
//   2. Replace punctuation, tab and newline with spaces
//   3. Split on spaces, drop empty pieces
//   4. Map each word to its vocabulary index (unknown → 1)
//   5. Keep the LAST max_len indices, left-pad with 0
//
// Example with max_len = 6:
//   "Good movie!"  → ["good", "movie"] → [2, 3]
//                  → [0, 0, 0, 0, 2, 3]

use crate::domain::example::LabeledExample;
use crate::domain::vocabulary::{Vocabulary, PAD_INDEX};

/// Characters treated as word separators besides the space
const FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Padded sequences with their labels, index-aligned.
#[derive(Debug, Clone, Default)]
pub struct PaddedDataset {
    pub sequences: Vec<Vec<u32>>,
    pub labels:    Vec<u8>,
}

/// Borrows the vocabulary; holds no state of its own.
pub struct SequencePreprocessor<'a> {
    vocab:   &'a Vocabulary,
    max_len: usize,
}

impl<'a> SequencePreprocessor<'a> {
    pub fn new(vocab: &'a Vocabulary, max_len: usize) -> Self {
        Self { vocab, max_len }
    }

    /// Split text into lowercase words.
    pub fn tokenize(text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| if FILTERS.contains(c) { ' ' } else { c })
            .collect();

        cleaned
            .split(' ')
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Vocabulary indices for each word, unpadded
    pub fn encode(&self, text: &str) -> Vec<u32> {
        Self::tokenize(text)
            .iter()
            .map(|w| self.vocab.lookup(w))
            .collect()
    }

    /// Pre-truncate and left-pad to exactly max_len
    pub fn pad(&self, seq: &[u32]) -> Vec<u32> {
        if seq.len() >= self.max_len {
            return seq[seq.len() - self.max_len..].to_vec();
        }
        let mut out = vec![PAD_INDEX; self.max_len - seq.len()];
        out.extend_from_slice(seq);
        out
    }

    pub fn encode_padded(&self, text: &str) -> Vec<u32> {
        self.pad(&self.encode(text))
    }

    /// Encode a whole dataset, keeping example order.
    pub fn process(&self, examples: &[LabeledExample]) -> PaddedDataset {
        let sequences: Vec<Vec<u32>> = examples
            .iter()
            .map(|ex| self.encode_padded(&ex.text))
            .collect();
        let labels: Vec<u8> = examples.iter().map(|ex| ex.label).collect();

        let unknown = sequences
            .iter()
            .flatten()
            .filter(|&&i| i == crate::domain::vocabulary::UNK_INDEX)
            .count();
        tracing::debug!(
            "Encoded {} texts to length {} ({} unknown tokens)",
            sequences.len(),
            self.max_len,
            unknown,
        );

        PaddedDataset { sequences, labels }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocabulary::UNK_INDEX;

    fn vocab() -> Vocabulary {
        let mut v = Vocabulary::new();
        for w in ["good", "movie", "bad", "film"] {
            v.push(w);
        }
        v
    }

    #[test]
    fn test_tokenize_lowercases_and_strips_punctuation() {
        assert_eq!(
            SequencePreprocessor::tokenize("Good, MOVIE!\tdon't"),
            vec!["good", "movie", "don't"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(SequencePreprocessor::tokenize("  ...  ").is_empty());
    }

    #[test]
    fn test_unknown_words_map_to_one() {
        let v = vocab();
        let p = SequencePreprocessor::new(&v, 4);
        assert_eq!(p.encode("good popcorn"), vec![2, UNK_INDEX]);
    }

    #[test]
    fn test_short_sequence_is_left_padded() {
        let v = vocab();
        let p = SequencePreprocessor::new(&v, 5);
        assert_eq!(p.encode_padded("bad film"), vec![0, 0, 0, 4, 5]);
    }

    #[test]
    fn test_long_sequence_keeps_the_tail() {
        let v = vocab();
        let p = SequencePreprocessor::new(&v, 2);
        assert_eq!(p.encode_padded("good movie bad film"), vec![4, 5]);
    }

    #[test]
    fn test_length_is_always_max_len() {
        let v = vocab();
        let p = SequencePreprocessor::new(&v, 7);
        for text in ["", "good", "good movie bad film good movie bad film good"] {
            assert_eq!(p.encode_padded(text).len(), 7);
        }
    }

    #[test]
    fn test_process_preserves_order_and_pairing() {
        let v = vocab();
        let p = SequencePreprocessor::new(&v, 350);
        let examples = vec![
            LabeledExample::new("good movie", 1),
            LabeledExample::new("bad film", 0),
        ];
        let out = p.process(&examples);

        assert_eq!(out.sequences.len(), 2);
        assert_eq!(out.labels, vec![1, 0]);
        for seq in &out.sequences {
            assert_eq!(seq.len(), 350);
            assert!(seq[..348].iter().all(|&i| i == 0));
        }
        assert_eq!(&out.sequences[0][348..], &[2, 3]);
        assert_eq!(&out.sequences[1][348..], &[4, 5]);
    }
}
