// ============================================================
// Layer 3 — Core Traits
// ============================================================
// The seam between the application layer and whatever reads
// labelled examples off disk.

use anyhow::Result;
use crate::domain::example::LabeledExample;

// ─── ExampleSource ────────────────────────────────────────────────────────────
/// Any component that can produce a full set of labelled examples.
///
/// Implementations:
///   - JsonlLoader → one JSON object per line, shuffled on load
pub trait ExampleSource {
    /// Load every example from this source.
    fn load_all(&self) -> Result<Vec<LabeledExample>>;
}
