use burn::data::dataset::Dataset;

use crate::domain::sequence::LabeledBatch;

/// One sequence with its per-position labels.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSample {
    pub values: Vec<f64>,
    pub labels: Vec<u8>,
}

impl SequenceSample {
    pub fn seq_len(&self) -> usize { self.values.len() }
}

#[derive(Debug, Clone)]
pub struct SequenceDataset {
    samples: Vec<SequenceSample>,
}

impl SequenceDataset {
    pub fn new(samples: Vec<SequenceSample>) -> Self { Self { samples } }

    pub fn samples(&self) -> &[SequenceSample] { &self.samples }

    pub fn into_samples(self) -> Vec<SequenceSample> { self.samples }
}

impl From<LabeledBatch> for SequenceDataset {
    fn from(batch: LabeledBatch) -> Self {
        let samples = batch
            .values
            .into_iter()
            .zip(batch.labels)
            .map(|(values, labels)| SequenceSample { values, labels })
            .collect();
        Self::new(samples)
    }
}

impl Dataset<SequenceSample> for SequenceDataset {
    fn get(&self, index: usize) -> Option<SequenceSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> SequenceDataset {
        LabeledBatch::from_values(vec![
            vec![0.1, 0.9],
            vec![0.6, 0.7],
            vec![0.2, 0.3],
        ])
        .into()
    }

    #[test]
    fn test_rows_become_samples() {
        let ds = dataset();
        assert_eq!(ds.len(), 3);
        let second = ds.get(1).unwrap();
        assert_eq!(second.labels, vec![1, 1]);
        assert!(ds.get(3).is_none());
    }

    #[test]
    fn test_empty_dataset() {
        let ds = SequenceDataset::new(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.get(0).is_none());
    }
}
