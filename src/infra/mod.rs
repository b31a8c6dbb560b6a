// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Output side of a training run:
//
//   metrics.rs — epoch history and its CSV log
//   plot.rs    — accuracy and loss curves rendered as SVG

/// Training history and CSV metrics logger
pub mod metrics;

/// Learning-curve charts
pub mod plot;
