// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw files to tensor batches.
//
//   vector file              JSONL files
//       │                        │
//       ▼                        ▼
//   EmbeddingLoader          JsonlLoader      → shuffled examples
//       │                        │
//       └──── Vocabulary ───────►│
//                                ▼
//                       SequencePreprocessor  → padded id sequences
//                                │
//                                ▼
//                           TextDataset       → Burn Dataset
//                                │
//                                ▼
//                           TextBatcher       → tensor batches
//
// Each module handles one step.

/// Reads the pretrained vector file
pub mod embeddings;

/// Reads labelled and unlabelled JSONL files
pub mod loader;

/// Tokenises, indexes and pads texts
pub mod preprocessor;

/// Implements Burn's Dataset trait for padded samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
