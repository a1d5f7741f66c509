// ============================================================
// Layer 4 — Sequence Sampler
// ============================================================
// Generates a batch of uniform random sequences and their
// threshold labels.
//
// Random stream:
//   A 32-bit Mersenne Twister (MT19937) seeded with init_genrand.
//   Each value in [0, 1) takes two 32-bit outputs a, b:
//
//     value = ((a >> 5) * 2^26 + (b >> 6)) / 2^53
//
//   which is the usual 53-bit resolution double. With this stream
//   seed 20 yields 0.588, 0.898, 0.892, ... for the first row.
//
// The generator is created inside `generate`, so there is no
// process-wide seed: same arguments, same batch.

use rand_mt::Mt;

use crate::domain::error::SequenceError;
use crate::domain::sequence::LabeledBatch;
use crate::domain::traits::SequenceSource;

const TWO_POW_26: f64 = 67_108_864.0;
const TWO_POW_53: f64 = 9_007_199_254_740_992.0;

/// Uniform [0, 1) sequence generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceSampler;

impl SequenceSampler {
    pub fn new() -> Self {
        Self
    }
}

/// Draw one double in [0, 1) from the twister.
fn next_unit(rng: &mut Mt) -> f64 {
    let a = (rng.next_u32() >> 5) as f64;
    let b = (rng.next_u32() >> 6) as f64;
    (a * TWO_POW_26 + b) / TWO_POW_53
}

impl SequenceSource for SequenceSampler {
    fn generate(
        &self,
        batch_size: usize,
        seq_len:    usize,
        seed:       u64,
    ) -> Result<LabeledBatch, SequenceError> {
        SequenceError::require_positive("batch_size", batch_size)?;
        SequenceError::require_positive("seq_len", seq_len)?;
        let seed = u32::try_from(seed).map_err(|_| {
            SequenceError::invalid(format!("seed must fit in 32 bits, got {seed}"))
        })?;

        let mut rng = Mt::new(seed);
        let values: Vec<Vec<f64>> = (0..batch_size)
            .map(|_| (0..seq_len).map(|_| next_unit(&mut rng)).collect())
            .collect();

        tracing::debug!(
            "Sampled {} sequences of length {} (seed {})",
            batch_size, seq_len, seed
        );

        let batch = LabeledBatch::from_values(values);
        debug_assert!(batch.is_consistent());
        Ok(batch)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn round3(x: f64) -> f64 {
        (x * 1000.0).round() / 1000.0
    }

    #[test]
    fn test_seed_20_reference_row() {
        let batch = SequenceSampler::new().generate(1, 10, 20).unwrap();
        let expected = [0.588, 0.898, 0.892, 0.816, 0.036, 0.692, 0.379, 0.519, 0.658, 0.194];
        let got: Vec<f64> = batch.values[0].iter().map(|&v| round3(v)).collect();
        assert_eq!(got, expected);
        assert_eq!(batch.labels[0], vec![1, 1, 1, 1, 0, 1, 0, 1, 1, 0]);
    }

    #[test]
    fn test_labels_follow_threshold() {
        let batch = SequenceSampler::new().generate(1000, 10, 20).unwrap();
        for (values, labels) in batch.rows() {
            for (&v, &l) in values.iter().zip(labels) {
                assert_eq!(l == 1, v > 0.5);
            }
        }
    }

    #[test]
    fn test_values_in_unit_interval() {
        let batch = SequenceSampler::new().generate(200, 7, 3).unwrap();
        assert!(batch.values.iter().flatten().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn test_shape_matches_request() {
        let batch = SequenceSampler::new().generate(13, 4, 1).unwrap();
        assert_eq!(batch.shape(), (13, 4));
        assert!(batch.labels.iter().all(|row| row.len() == 4));
    }

    #[test]
    fn test_same_seed_is_bit_identical() {
        let sampler = SequenceSampler::new();
        let a = sampler.generate(50, 10, 42).unwrap();
        let b = sampler.generate(50, 10, 42).unwrap();
        let bits = |batch: &LabeledBatch| -> Vec<u64> {
            batch.values.iter().flatten().map(|v| v.to_bits()).collect()
        };
        assert_eq!(bits(&a), bits(&b));
        assert_eq!(a.labels, b.labels);
    }

    #[test]
    fn test_different_seeds_differ() {
        let sampler = SequenceSampler::new();
        let a = sampler.generate(5, 10, 20).unwrap();
        let b = sampler.generate(5, 10, 42).unwrap();
        assert_ne!(a.values, b.values);
    }

    #[test]
    fn test_first_row_independent_of_batch_size() {
        let sampler = SequenceSampler::new();
        let small = sampler.generate(1, 10, 20).unwrap();
        let large = sampler.generate(1000, 10, 20).unwrap();
        assert_eq!(small.values[0], large.values[0]);
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let sampler = SequenceSampler::new();
        assert!(matches!(
            sampler.generate(0, 10, 20),
            Err(SequenceError::InvalidArgument(_))
        ));
        assert!(matches!(
            sampler.generate(10, 0, 20),
            Err(SequenceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_oversized_seed_rejected() {
        let result = SequenceSampler::new().generate(1, 1, u64::from(u32::MAX) + 1);
        assert!(matches!(result, Err(SequenceError::InvalidArgument(_))));
    }
}
