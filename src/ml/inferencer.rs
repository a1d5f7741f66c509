// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Runs the frozen classifier on unlabelled sequences and returns
// the higher-probability class at every position.
use burn::{prelude::*, tensor::activation};

use crate::data::batcher::SequenceBatch;
use crate::domain::error::SequenceError;
use crate::domain::traits::SequenceLabeler;
use crate::ml::model::{argmax_labels, SequenceClassifier, SequenceClassifierConfig};

pub struct Inferencer<B: Backend> {
    model:  SequenceClassifier<B>,
    config: SequenceClassifierConfig,
    device: B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn new(model: SequenceClassifier<B>, config: SequenceClassifierConfig, device: B::Device) -> Self {
        Self { model, config, device }
    }

    /// inputs [batch, seq_len, 1] → labels [batch, seq_len]
    pub fn predict_tensor(&self, inputs: Tensor<B, 3>) -> Result<Tensor<B, 2, Int>, SequenceError> {
        self.config.check_input(inputs.dims())?;
        Ok(argmax_labels(self.model.forward(inputs)?))
    }

    pub fn predict_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<u8>>, SequenceError> {
        let inputs = SequenceBatch::<B>::inputs_from_rows(rows, &self.device)?;
        let [_, seq_len, _] = inputs.dims();
        let flat: Vec<i64> = self
            .predict_tensor(inputs)?
            .into_data()
            .convert::<i64>()
            .to_vec()
            .map_err(|e| SequenceError::invalid(format!("reading predictions: {e:?}")))?;
        Ok(flat
            .chunks(seq_len)
            .map(|row| row.iter().map(|&c| c as u8).collect())
            .collect())
    }

    /// Probability of class 1 at every position.
    pub fn positive_probabilities(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f32>>, SequenceError> {
        let inputs = SequenceBatch::<B>::inputs_from_rows(rows, &self.device)?;
        self.config.check_input(inputs.dims())?;
        let [batch, seq_len, _] = inputs.dims();
        let probs = activation::softmax(self.model.forward(inputs)?, 2)
            .slice([0..batch, 0..seq_len, 1..2])
            .reshape([batch * seq_len]);
        let flat: Vec<f32> = probs
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|e| SequenceError::invalid(format!("reading probabilities: {e:?}")))?;
        Ok(flat.chunks(seq_len).map(<[f32]>::to_vec).collect())
    }
}

impl<B: Backend> SequenceLabeler for Inferencer<B> {
    fn predict(&self, values: &[Vec<f64>]) -> Result<Vec<Vec<u8>>, SequenceError> {
        self.predict_rows(values)
    }
}
