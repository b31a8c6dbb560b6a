// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model, training and inference code lives here.
//
//   model.rs      — the TextCnn architecture over a frozen
//                   pretrained embedding table
//   metrics.rs    — accuracy, per-batch F1, confusion matrix
//   trainer.rs    — epoch loop: forward, loss, backward,
//                   Adam step, validation
//   inferencer.rs — scores unlabelled files with the trained
//                   model

use burn::backend::{Autodiff, NdArray};

/// Backend used while training (CPU with gradient tracking)
pub type TrainBackend = Autodiff<NdArray>;

/// Backend used for validation and prediction
pub type EvalBackend = NdArray;

/// TextCnn architecture
pub mod model;

/// Binary classification metrics
pub mod metrics;

/// Training loop with per-epoch validation
pub mod trainer;

/// Prediction over unlabelled JSONL files
pub mod inferencer;
