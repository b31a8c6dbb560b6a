// ============================================================
// Layer 4 — Text Batcher
// ============================================================
// Implements Burn's Batcher trait to stack TextSamples into
// tensors.
//
//   Input:  Vec of N TextSamples, each with S token ids
//   Output: TextBatch with token_ids [N, S] and labels [N]
//
// All sequences are pre-padded to the same length, so the
// flat id list reshapes straight into [N, S].

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::TextSample;

// ─── TextBatch ────────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct TextBatch<B: Backend> {
    /// Token id sequences, shape [batch_size, seq_len]
    pub token_ids: Tensor<B, 2, Int>,

    /// Binary labels, shape [batch_size]
    pub labels: Tensor<B, 1, Int>,

    /// Host copy of the labels as floats, for metric accumulation
    pub targets: Vec<f32>,
}

// ─── TextBatcher ──────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct TextBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TextBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

/// Stack already-padded id sequences into a [n, seq_len] tensor.
pub fn ids_to_tensor<B: Backend>(rows: &[Vec<u32>], device: &B::Device) -> Tensor<B, 2, Int> {
    let batch_size = rows.len();
    let seq_len    = rows.first().map(Vec::len).unwrap_or(0);

    // Burn Int tensors are built from i32
    let flat: Vec<i32> = rows
        .iter()
        .flat_map(|r| r.iter().map(|&x| x as i32))
        .collect();

    Tensor::<B, 1, Int>::from_ints(flat.as_slice(), device)
        .reshape([batch_size, seq_len])
}

impl<B: Backend> Batcher<TextSample, TextBatch<B>> for TextBatcher<B> {
    fn batch(&self, items: Vec<TextSample>) -> TextBatch<B> {
        let rows: Vec<Vec<u32>> = items.iter().map(|s| s.token_ids.clone()).collect();
        let token_ids = ids_to_tensor::<B>(&rows, &self.device);

        let label_ints: Vec<i32> = items.iter().map(|s| i32::from(s.label)).collect();
        let labels = Tensor::<B, 1, Int>::from_ints(label_ints.as_slice(), &self.device);

        let targets = items.iter().map(|s| f32::from(s.label)).collect();

        TextBatch { token_ids, labels, targets }
    }
}
