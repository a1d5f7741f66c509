// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination

// Generate a batch and return rows for inspection
pub mod sample_use_case;

// Sample, split, train, evaluate
pub mod train_use_case;
