// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Coordinates the other layers to run a training session.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination

// The training workflow
pub mod train_use_case;
