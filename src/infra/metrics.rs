// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records one CSV row per evaluation during training.
//
// Metrics recorded:
//   - step:       optimizer steps taken so far
//   - train_loss: mean cross-entropy of the latest training batch
//   - val_loss:   mean cross-entropy over the evaluation rows
//   - val_acc:    fraction of positions labelled correctly
//
// Output file: <metrics-dir>/metrics.csv
//
// Example CSV output:
//   step,train_loss,val_loss,val_acc
//   20,0.693100,0.691800,0.512000
//   40,0.684200,0.680900,0.604000
//   ...
//
// A random classifier starts near ln 2 ≈ 0.693 loss and 50% accuracy.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

const HEADER: &str = "step,train_loss,val_loss,val_acc";

/// One row of metrics data for a single evaluation
#[derive(Debug, Clone)]
pub struct StepMetrics {
    pub step: usize,

    /// Loss on the batch the optimizer just stepped on
    pub train_loss: f64,

    /// Loss on held-out rows
    pub val_loss: f64,

    /// Range: [0.0, 1.0]
    pub val_acc: f64,
}

impl StepMetrics {
    pub fn new(step: usize, train_loss: f64, val_loss: f64, val_acc: f64) -> Self {
        Self { step, train_loss, val_loss, val_acc }
    }
}

/// Appends evaluation metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet, so
    /// repeated runs append to the same log.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &StepMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.step,
            m.train_loss,
            m.val_loss,
            m.val_acc,
        )?;

        tracing::debug!(
            "Logged step {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.step,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_header_written_once_and_rows_appended() {
        let dir = tempdir().unwrap();

        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&StepMetrics::new(1, 0.7, 0.69, 0.5)).unwrap();

        // A second logger on the same directory must not repeat the header
        let again = MetricsLogger::new(dir.path()).unwrap();
        again.log(&StepMetrics::new(2, 0.65, 0.64, 0.75)).unwrap();

        let text  = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            HEADER,
            "1,0.700000,0.690000,0.500000",
            "2,0.650000,0.640000,0.750000",
        ]);
    }
}
