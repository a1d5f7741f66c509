// ============================================================
// Layer 3 — Labelled Sequence Batch
// ============================================================
// A batch is `batch_size` sequences of `seq_len` values in [0, 1).
// Every value has a parallel label:
//
//   label = 1  if value > 0.5
//   label = 0  otherwise
//
// The label is a pure function of the value, so a batch can
// always be checked against the rule with `is_consistent`.

/// Values strictly above this are labelled 1.
pub const THRESHOLD: f64 = 0.5;

/// Label a single value.
pub fn threshold(value: f64) -> u8 {
    u8::from(value > THRESHOLD)
}

/// Label a whole sequence.
pub fn threshold_all(values: &[f64]) -> Vec<u8> {
    values.iter().map(|&v| threshold(v)).collect()
}

/// A batch of sequences together with their threshold labels.
/// Both matrices are stored row-major: `values[i][t]` is
/// position `t` of sequence `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledBatch {
    pub values: Vec<Vec<f64>>,
    pub labels: Vec<Vec<u8>>,
}

impl LabeledBatch {
    /// Build a batch from raw values, deriving the labels.
    pub fn from_values(values: Vec<Vec<f64>>) -> Self {
        let labels = values.iter().map(|row| threshold_all(row)).collect();
        Self { values, labels }
    }

    pub fn batch_size(&self) -> usize {
        self.values.len()
    }

    /// Length of each sequence (0 for an empty batch).
    pub fn seq_len(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    /// (batch_size, seq_len)
    pub fn shape(&self) -> (usize, usize) {
        (self.batch_size(), self.seq_len())
    }

    /// True when every row has the same length and every label
    /// matches the threshold rule.
    pub fn is_consistent(&self) -> bool {
        let seq_len = self.seq_len();
        self.values.len() == self.labels.len()
            && self.values.iter().zip(&self.labels).all(|(v, l)| {
                v.len() == seq_len
                    && l.len() == seq_len
                    && v.iter().zip(l).all(|(&x, &y)| threshold(x) == y)
            })
    }

    /// Iterate over (values, labels) row pairs.
    pub fn rows(&self) -> impl Iterator<Item = (&[f64], &[u8])> {
        self.values
            .iter()
            .zip(&self.labels)
            .map(|(v, l)| (v.as_slice(), l.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(threshold(0.5), 0);
        assert_eq!(threshold(0.500_001), 1);
        assert_eq!(threshold(0.0), 0);
        assert_eq!(threshold(0.999), 1);
    }

    #[test]
    fn test_from_values_derives_labels() {
        let batch = LabeledBatch::from_values(vec![vec![0.1, 0.7], vec![0.5, 0.51]]);
        assert_eq!(batch.labels, vec![vec![0, 1], vec![0, 1]]);
        assert_eq!(batch.shape(), (2, 2));
        assert!(batch.is_consistent());
    }

    #[test]
    fn test_inconsistent_label_detected() {
        let mut batch = LabeledBatch::from_values(vec![vec![0.9, 0.2]]);
        batch.labels[0][1] = 1;
        assert!(!batch.is_consistent());
    }
}
