// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe the problem:
//
//   sequence.rs — a labelled batch of random sequences and the
//                 0.5 threshold rule that produces the labels
//   error.rs    — the typed error kinds every other layer reports
//   traits.rs   — the seams between sampling and classification
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits

// A batch of sequences with their threshold labels
pub mod sequence;

// InvalidArgument / ShapeMismatch / NumericInstability
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
