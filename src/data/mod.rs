// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between "a seed" and "tensor batches":
//
//   SequenceSampler   → uniform [0, 1) values + threshold labels
//       │
//       ▼
//   split_train_val   → seeded shuffle into train / validation
//       │
//       ▼
//   SequenceDataset   → implements Burn's Dataset trait
//       │
//       ▼
//   SequenceBatcher   → stacks samples into [N, T, 1] / [N, T] tensors

/// Seeded MT19937 sequence generator
pub mod sampler;

/// Implements Burn's Dataset trait for labelled sequences
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
