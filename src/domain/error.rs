// ============================================================
// Layer 3 — Domain Errors
// ============================================================
// The three failure kinds the sampler and classifier report.
// Everything propagates straight to the caller; nothing here
// is retried.

/// Errors raised by the sampler and the classifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SequenceError {
    /// A size or shape configuration value was zero or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A batch fed to the classifier does not match its configured dimensions.
    #[error("shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what:     &'static str,
        expected: usize,
        actual:   usize,
    },

    /// The training loss stopped being a finite number.
    #[error("loss became non-finite at step {step}: {loss}")]
    NumericInstability { step: usize, loss: f64 },
}

impl SequenceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Fails with `InvalidArgument` when `value` is zero.
    pub fn require_positive(name: &str, value: usize) -> Result<usize, Self> {
        if value == 0 {
            Err(Self::invalid(format!("{name} must be positive, got 0")))
        } else {
            Ok(value)
        }
    }

    /// Fails with `ShapeMismatch` when `actual != expected`.
    pub fn require_dim(what: &'static str, expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::ShapeMismatch { what, expected, actual })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert_eq!(SequenceError::require_positive("seq_len", 3), Ok(3));
        assert!(matches!(
            SequenceError::require_positive("seq_len", 0),
            Err(SequenceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_require_dim_reports_both_sides() {
        let err = SequenceError::require_dim("seq_len", 10, 9).unwrap_err();
        assert_eq!(err.to_string(), "shape mismatch in seq_len: expected 10, got 9");
    }
}
