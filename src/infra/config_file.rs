// ============================================================
// Layer 6 — Config File
// ============================================================
// Reads and writes TrainConfig as pretty JSON, e.g.
//
//   {
//     "seq_len": 10,
//     "batch_size": 1000,
//     "hidden_units": 7,
//     "learning_rate": 0.001,
//     ...
//   }
//
// Missing fields fall back to TrainConfig::default().

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::application::train_use_case::TrainConfig;

pub fn load_config(path: impl AsRef<Path>) -> Result<TrainConfig> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

    let cfg = serde_json::from_str(&json)
        .with_context(|| format!("Invalid training config in '{}'", path.display()))?;

    tracing::debug!("Loaded training config from '{}'", path.display());
    Ok(cfg)
}

pub fn save_config(path: impl AsRef<Path>, cfg: &TrainConfig) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(cfg)?;

    fs::write(path, json)
        .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

    tracing::debug!("Saved training config to '{}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::OutputMode;
    use tempfile::tempdir;

    #[test]
    fn test_save_then_load() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("train.json");
        let cfg  = TrainConfig {
            hidden_units: 12,
            output_mode:  OutputMode::FinalState,
            ..TrainConfig::default()
        };
        save_config(&path, &cfg).unwrap();
        assert_eq!(load_config(&path).unwrap(), cfg);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{ "seq_len": 4, "steps": 3 }"#).unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.seq_len, 4);
        assert_eq!(cfg.steps, 3);
        assert_eq!(cfg.hidden_units, TrainConfig::default().hidden_units);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load_config(dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Cannot read config"));
    }
}
