// ============================================================
// Layer 2 — SampleUseCase
// ============================================================
// Generates a labelled batch and hands back the first few rows
// for inspection. Printing is left to the CLI layer.

use anyhow::Result;

use crate::data::sampler::SequenceSampler;
use crate::domain::sequence::LabeledBatch;
use crate::domain::traits::SequenceSource;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub seq_len:    usize,
    pub batch_size: usize,
    pub seed:       u64,
    /// How many leading rows to return.
    pub show:       usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self { seq_len: 10, batch_size: 1000, seed: 20, show: 1 }
    }
}

pub struct SampleUseCase<S: SequenceSource = SequenceSampler> {
    config: SampleConfig,
    source: S,
}

impl SampleUseCase {
    pub fn new(config: SampleConfig) -> Self {
        Self::with_source(config, SequenceSampler::new())
    }
}

impl<S: SequenceSource> SampleUseCase<S> {
    pub fn with_source(config: SampleConfig, source: S) -> Self {
        Self { config, source }
    }

    /// Generate the whole batch and keep the first `show` rows.
    pub fn execute(&self) -> Result<LabeledBatch> {
        let cfg   = &self.config;
        let batch = self.source.generate(cfg.batch_size, cfg.seq_len, cfg.seed)?;
        tracing::info!(
            "Generated {}x{} batch, {} positive labels",
            cfg.batch_size,
            cfg.seq_len,
            batch.labels.iter().flatten().filter(|&&l| l == 1).count()
        );

        let show = cfg.show.min(batch.batch_size());
        Ok(LabeledBatch {
            values: batch.values[..show].to_vec(),
            labels: batch.labels[..show].to_vec(),
        })
    }
}

/// `[0.588, 0.898, ...]` with three decimals.
pub fn format_values(values: &[f64]) -> String {
    let cells: Vec<String> = values.iter().map(|v| format!("{v:.3}")).collect();
    format!("[{}]", cells.join(", "))
}

/// `[1, 1, 0, ...]`
pub fn format_labels(labels: &[u8]) -> String {
    let cells: Vec<String> = labels.iter().map(u8::to_string).collect();
    format!("[{}]", cells.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::SequenceError;

    #[test]
    fn test_reference_output_for_seed_20() {
        let rows = SampleUseCase::new(SampleConfig::default()).execute().unwrap();
        assert_eq!(rows.batch_size(), 1);
        assert_eq!(
            format_values(&rows.values[0]),
            "[0.588, 0.898, 0.892, 0.816, 0.036, 0.692, 0.379, 0.519, 0.658, 0.194]"
        );
        assert_eq!(format_labels(&rows.labels[0]), "[1, 1, 1, 1, 0, 1, 0, 1, 1, 0]");
    }

    #[test]
    fn test_show_clamped_to_batch() {
        let cfg  = SampleConfig { batch_size: 3, show: 10, ..SampleConfig::default() };
        let rows = SampleUseCase::new(cfg).execute().unwrap();
        assert_eq!(rows.shape(), (3, 10));
    }

    struct Constant;

    impl SequenceSource for Constant {
        fn generate(&self, batch_size: usize, seq_len: usize, _seed: u64)
            -> Result<LabeledBatch, SequenceError>
        {
            Ok(LabeledBatch::from_values(vec![vec![0.75; seq_len]; batch_size]))
        }
    }

    #[test]
    fn test_custom_source() {
        let cfg  = SampleConfig { batch_size: 2, seq_len: 3, show: 2, seed: 0 };
        let rows = SampleUseCase::with_source(cfg, Constant).execute().unwrap();
        assert_eq!(rows.labels, vec![vec![1, 1, 1], vec![1, 1, 1]]);
    }

    #[test]
    fn test_zero_batch_is_invalid_argument() {
        let cfg = SampleConfig { batch_size: 0, ..SampleConfig::default() };
        let err = SampleUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SequenceError>(),
            Some(SequenceError::InvalidArgument(_))
        ));
    }
}
