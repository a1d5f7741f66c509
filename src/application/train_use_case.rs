// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates a full training run in order:
//
//   Step 1: Validate the configuration
//   Step 2: Sample the labelled batch      (Layer 4 - data)
//   Step 3: Split train/validation         (Layer 4 - data)
//   Step 4: Build datasets                 (Layer 4 - data)
//   Step 5: Open the metrics log           (Layer 6 - infra)
//   Step 6: Run the training loop          (Layer 5 - ml)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::SequenceDataset,
    sampler::SequenceSampler,
    splitter::split_train_val,
};
use crate::domain::error::SequenceError;
use crate::domain::traits::SequenceSource;
use crate::infra::metrics::MetricsLogger;
use crate::ml::model::OutputMode;
use crate::ml::trainer::{run_training, TrainReport};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. One seed drives sampling,
// the split shuffle, and weight initialisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub seq_len:        usize,
    pub batch_size:     usize,
    pub hidden_units:   usize,
    pub learning_rate:  f64,
    pub seed:           u64,
    pub steps:          usize,
    pub mini_batch:     usize,
    pub eval_every:     usize,
    pub train_fraction: f64,
    pub output_mode:    OutputMode,
    pub metrics_dir:    Option<String>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            seq_len:        10,
            batch_size:     1000,
            hidden_units:   7,
            learning_rate:  1e-3,
            seed:           42,
            steps:          200,
            mini_batch:     50,
            eval_every:     20,
            train_fraction: 0.8,
            output_mode:    OutputMode::PerStep,
            metrics_dir:    None,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<(), SequenceError> {
        SequenceError::require_positive("seq_len", self.seq_len)?;
        SequenceError::require_positive("batch_size", self.batch_size)?;
        SequenceError::require_positive("hidden_units", self.hidden_units)?;
        SequenceError::require_positive("mini_batch", self.mini_batch)?;
        SequenceError::require_positive("steps", self.steps)?;
        SequenceError::require_positive("eval_every", self.eval_every)?;
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(SequenceError::invalid(format!(
                "learning_rate must be positive, got {}", self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.train_fraction) {
            return Err(SequenceError::invalid(format!(
                "train_fraction must be within [0, 1], got {}", self.train_fraction
            )));
        }
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1: Reject bad sizes before any work ──────────────────────────
        cfg.validate()?;

        // ── Step 2: Sample the labelled batch ─────────────────────────────────
        tracing::info!(
            "Sampling {} sequences of length {} (seed {})",
            cfg.batch_size, cfg.seq_len, cfg.seed
        );
        let batch = SequenceSampler::new().generate(cfg.batch_size, cfg.seq_len, cfg.seed)?;

        // ── Step 3: Train / validation split ──────────────────────────────────
        let samples = SequenceDataset::from(batch).into_samples();
        let (train_samples, val_samples) = split_train_val(samples, cfg.train_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation",
            train_samples.len(),
            val_samples.len()
        );

        // ── Step 4: Build Burn datasets ───────────────────────────────────────
        let train_dataset = SequenceDataset::new(train_samples);
        let val_dataset   = SequenceDataset::new(val_samples);

        // ── Step 5: Metrics CSV, if requested ─────────────────────────────────
        let metrics = cfg
            .metrics_dir
            .as_deref()
            .map(MetricsLogger::new)
            .transpose()?;

        // ── Step 6: Run training loop (Layer 5) ───────────────────────────────
        run_training(cfg, train_dataset, val_dataset, metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn small_config() -> TrainConfig {
        TrainConfig {
            seq_len:    4,
            batch_size: 60,
            steps:      6,
            mini_batch: 10,
            eval_every: 3,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_defaults_match_reference_constants() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.seq_len, 10);
        assert_eq!(cfg.batch_size, 1000);
        assert_eq!(cfg.hidden_units, 7);
        assert_eq!(cfg.learning_rate, 0.001);
    }

    #[test]
    fn test_invalid_sizes_rejected_before_training() {
        let cfg = TrainConfig { seq_len: 0, ..small_config() };
        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SequenceError>(),
            Some(SequenceError::InvalidArgument(_))
        ));
    }

    fn assert_invalid(cfg: TrainConfig) {
        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SequenceError>(),
            Some(SequenceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_steps_rejected() {
        assert_invalid(TrainConfig { steps: 0, ..small_config() });
    }

    #[test]
    fn test_zero_eval_every_rejected() {
        assert_invalid(TrainConfig { eval_every: 0, ..small_config() });
    }

    #[test]
    fn test_execute_writes_metrics() {
        let dir = tempdir().unwrap();
        let cfg = TrainConfig {
            metrics_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..small_config()
        };
        let report = TrainUseCase::new(cfg).execute().unwrap();
        assert_eq!(report.steps, 6);

        let csv = std::fs::read_to_string(dir.path().join("metrics.csv")).unwrap();
        // header + evaluations at steps 3 and 6
        assert_eq!(csv.lines().count(), 3);
    }
}
