// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the system
// works with: labelled texts and the word lookup tables.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - Only plain structs, enums, and traits

// Labelled and unlabelled text records
pub mod example;

// Word → index mapping and the matching vector table
pub mod vocabulary;

// Abstractions the data layer implements
pub mod traits;
