use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::preprocessor::PaddedDataset;

/// One padded sequence and its label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSample {
    pub token_ids: Vec<u32>,
    pub label:     u8,
}

pub struct TextDataset {
    samples: Vec<TextSample>,
}

impl TextDataset {
    pub fn new(samples: Vec<TextSample>) -> Self { Self { samples } }
}

impl From<PaddedDataset> for TextDataset {
    fn from(padded: PaddedDataset) -> Self {
        let samples = padded
            .sequences
            .into_iter()
            .zip(padded.labels)
            .map(|(token_ids, label)| TextSample { token_ids, label })
            .collect();
        Self::new(samples)
    }
}

impl Dataset<TextSample> for TextDataset {
    fn get(&self, index: usize) -> Option<TextSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_padded_keeps_pairs() {
        let padded = PaddedDataset {
            sequences: vec![vec![0, 2], vec![0, 3]],
            labels:    vec![1, 0],
        };
        let ds = TextDataset::from(padded);
        assert_eq!(ds.len(), 2);
        let second = ds.get(1).unwrap();
        assert_eq!(second.token_ids, vec![0, 3]);
        assert_eq!(second.label, 0);
        assert!(ds.get(2).is_none());
    }
}
