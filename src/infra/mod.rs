// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that touch the filesystem:
//
//   metrics.rs     — appends per-evaluation loss/accuracy rows to
//                    a CSV file for plotting learning curves
//
//   config_file.rs — loads a TrainConfig from JSON so a run can be
//                    repeated without retyping flags
//
// Model weights are never written to disk.

/// Training metrics CSV logger
pub mod metrics;

/// JSON training-config loading and saving
pub mod config_file;
