// ============================================================
// Layer 4 — Sequence Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<SequenceSample>
// into tensors the recurrent classifier can consume.
//
// How batching works here:
//   Input:  Vec of N SequenceSamples, each of length T
//   Output: SequenceBatch with
//             inputs  [N, T, 1]  (one scalar feature per step)
//             targets [N, T]     (0 / 1 class index per step)
//
//   Values are flattened row-major and reshaped:
//   [s1_t1, s1_t2, ..., s1_tT, s2_t1, ..., sN_tT] → [N, T, 1]

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::SequenceSample;
use crate::domain::error::SequenceError;

// ─── SequenceBatch ────────────────────────────────────────────────────────────
/// A batch of sequences ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct SequenceBatch<B: Backend> {
    /// Input values — shape: [batch_size, seq_len, 1]
    pub inputs: Tensor<B, 3>,

    /// Ground truth labels — shape: [batch_size, seq_len]
    pub targets: Tensor<B, 2, Int>,
}

impl<B: Backend> SequenceBatch<B> {
    /// Inputs only, for prediction on unlabelled sequences.
    /// Rows must all have the same length.
    pub fn inputs_from_rows(
        rows:   &[Vec<f64>],
        device: &B::Device,
    ) -> Result<Tensor<B, 3>, SequenceError> {
        let seq_len = rectangular_len(rows.iter().map(Vec::len))?;
        let flat: Vec<f32> = rows.iter().flatten().map(|&v| v as f32).collect();
        Ok(Tensor::<B, 1>::from_floats(flat.as_slice(), device)
            .reshape([rows.len(), seq_len, 1]))
    }

    pub fn dims(&self) -> [usize; 3] {
        self.inputs.dims()
    }
}

/// Common row length, or an error if rows are missing or ragged.
fn rectangular_len(mut lens: impl Iterator<Item = usize>) -> Result<usize, SequenceError> {
    let first = lens
        .next()
        .ok_or_else(|| SequenceError::invalid("cannot batch zero sequences"))?;
    SequenceError::require_positive("seq_len", first)?;
    for len in lens {
        SequenceError::require_dim("seq_len", first, len)?;
    }
    Ok(first)
}

// ─── SequenceBatcher ──────────────────────────────────────────────────────────
#[derive(Clone, Debug, Default)]
pub struct SequenceBatcher;

impl SequenceBatcher {
    pub fn new() -> Self {
        Self
    }

    /// Validate that the samples form a rectangular batch, then stack them.
    pub fn try_batch<B: Backend>(
        &self,
        items:  Vec<SequenceSample>,
        device: &B::Device,
    ) -> Result<SequenceBatch<B>, SequenceError> {
        rectangular_len(items.iter().map(SequenceSample::seq_len))?;
        for item in &items {
            SequenceError::require_dim("label length", item.values.len(), item.labels.len())?;
        }
        Ok(Batcher::<B, SequenceSample, SequenceBatch<B>>::batch(self, items, device))
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
impl<B: Backend> Batcher<B, SequenceSample, SequenceBatch<B>> for SequenceBatcher {
    fn batch(&self, items: Vec<SequenceSample>, device: &B::Device) -> SequenceBatch<B> {
        let batch_size = items.len();
        let seq_len    = items.first().map_or(0, SequenceSample::seq_len);

        // Burn float tensors are f32 on the NdArray backend
        let input_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.values.iter().map(|&v| v as f32))
            .collect();

        let target_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.labels.iter().map(|&l| l as i32))
            .collect();

        let inputs = Tensor::<B, 1>::from_floats(input_flat.as_slice(), device)
            .reshape([batch_size, seq_len, 1]);

        let targets = Tensor::<B, 1, Int>::from_ints(target_flat.as_slice(), device)
            .reshape([batch_size, seq_len]);

        SequenceBatch { inputs, targets }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn sample(values: Vec<f64>) -> SequenceSample {
        let labels = crate::domain::sequence::threshold_all(&values);
        SequenceSample { values, labels }
    }

    #[test]
    fn test_batch_shapes() {
        let device = Default::default();
        let items  = vec![sample(vec![0.1, 0.9, 0.4]), sample(vec![0.8, 0.2, 0.7])];
        let batch: SequenceBatch<TestBackend> =
            SequenceBatcher::new().try_batch(items, &device).unwrap();
        assert_eq!(batch.inputs.dims(), [2, 3, 1]);
        assert_eq!(batch.targets.dims(), [2, 3]);

        let targets: Vec<i64> = batch.targets.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(targets, vec![0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let device = Default::default();
        let items  = vec![sample(vec![0.1, 0.9]), sample(vec![0.8])];
        let result = SequenceBatcher::new().try_batch::<TestBackend>(items, &device);
        assert!(matches!(result, Err(SequenceError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_empty_batch_rejected() {
        let device = Default::default();
        let result = SequenceBatcher::new().try_batch::<TestBackend>(Vec::new(), &device);
        assert!(matches!(result, Err(SequenceError::InvalidArgument(_))));
    }

    #[test]
    fn test_inputs_from_rows() {
        let device = Default::default();
        let inputs = SequenceBatch::<TestBackend>::inputs_from_rows(
            &[vec![0.25, 0.75], vec![0.5, 1.0]], &device,
        ).unwrap();
        assert_eq!(inputs.dims(), [2, 2, 1]);
    }
}
