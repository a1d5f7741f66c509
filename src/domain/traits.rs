// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to sampling and classification
// through these traits, so a different generator (or a model on
// another backend) can be dropped in without touching it.

use crate::domain::error::SequenceError;
use crate::domain::sequence::LabeledBatch;

// ─── SequenceSource ───────────────────────────────────────────────────────────
/// Anything that can produce a labelled batch of sequences.
///
/// Implementations:
///   - SequenceSampler → uniform MT19937 draws thresholded at 0.5
pub trait SequenceSource {
    /// Produce `batch_size` sequences of length `seq_len`.
    /// The same seed must always give the same batch.
    fn generate(
        &self,
        batch_size: usize,
        seq_len:    usize,
        seed:       u64,
    ) -> Result<LabeledBatch, SequenceError>;
}

// ─── SequenceLabeler ──────────────────────────────────────────────────────────
/// Anything that can predict a 0/1 label for every position of
/// every sequence in a batch.
///
/// Implementations:
///   - Inferencer → argmax over the recurrent classifier's logits
pub trait SequenceLabeler {
    fn predict(&self, values: &[Vec<f64>]) -> Result<Vec<Vec<u8>>, SequenceError>;
}
