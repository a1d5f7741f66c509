// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Forward → mean cross-entropy → backward → Adam update, one
// mini-batch at a time, with periodic evaluation on held-out rows.
//
//   - Training uses TrainBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns the model on InferBackend (NdArray)
//   - Evaluation batches must also be built on InferBackend
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{SequenceBatch, SequenceBatcher},
    dataset::{SequenceDataset, SequenceSample},
};
use crate::domain::error::SequenceError;
use crate::domain::traits::SequenceLabeler;
use crate::infra::metrics::{MetricsLogger, StepMetrics};
use crate::ml::inferencer::Inferencer;
use crate::ml::model::{argmax_labels, SequenceClassifier, SequenceClassifierConfig};

pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
pub type InferBackend = burn::backend::NdArray;

/// Where the classifier is in its lifecycle. `Uninitialized` is a
/// bare `SequenceClassifierConfig`; a `Trainer` always starts `Initialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initialized,
    Training,
    Evaluating,
}

/// Mean loss and per-position accuracy over an evaluated set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub loss:      f64,
    pub accuracy:  f64,
    pub positions: usize,
}

/// Owns the model parameters and the optimizer state.
/// The optimizer step is the only writer of the parameters.
pub struct Trainer<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<SequenceClassifier<B>, B>,
{
    config: SequenceClassifierConfig,
    model:  SequenceClassifier<B>,
    optim:  O,
    lr:     f64,
    steps:  usize,
    phase:  Phase,
}

impl<B, O> Trainer<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<SequenceClassifier<B>, B>,
{
    pub fn new(
        config: SequenceClassifierConfig,
        device: &B::Device,
        optim:  O,
        lr:     f64,
    ) -> Result<Self, SequenceError> {
        if !(lr.is_finite() && lr > 0.0) {
            return Err(SequenceError::invalid(format!(
                "learning rate must be a positive number, got {lr}"
            )));
        }
        let model = config.init::<B>(device)?;
        Ok(Self { config, model, optim, lr, steps: 0, phase: Phase::Initialized })
    }

    pub fn phase(&self) -> Phase { self.phase }

    pub fn steps(&self) -> usize { self.steps }

    /// One optimizer step on `batch`. Returns the loss before the update.
    pub fn train_step(&mut self, batch: &SequenceBatch<B>) -> Result<f64, SequenceError> {
        self.config.check_input(batch.dims())?;
        self.phase = Phase::Training;
        self.steps += 1;

        let (loss, _) = self
            .model
            .forward_loss(batch.inputs.clone(), batch.targets.clone())?;

        let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
        if !loss_val.is_finite() {
            return Err(SequenceError::NumericInstability { step: self.steps, loss: loss_val });
        }

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.model);
        self.model = self.optim.step(self.lr, self.model.clone(), grads);

        tracing::trace!("step {} loss={:.6}", self.steps, loss_val);
        Ok(loss_val)
    }

    /// Loss and accuracy on `batches` with the current parameters.
    /// Nothing is updated.
    pub fn evaluate(
        &mut self,
        batches: &[SequenceBatch<B::InnerBackend>],
    ) -> Result<Evaluation, SequenceError> {
        self.phase = Phase::Evaluating;
        let model = self.model.valid();

        let mut loss_sum  = 0.0f64;
        let mut correct   = 0usize;
        let mut positions = 0usize;

        for batch in batches {
            self.config.check_input(batch.dims())?;
            let (loss, logits) = model.forward_loss(batch.inputs.clone(), batch.targets.clone())?;
            let [b, t, _] = batch.dims();

            // The loss is a per-position mean, so weight it back by position count
            loss_sum  += loss.into_scalar().elem::<f64>() * (b * t) as f64;
            positions += b * t;

            let hits: i64 = argmax_labels(logits)
                .equal(batch.targets.clone())
                .int().sum().into_scalar().elem::<i64>();
            correct += hits as usize;
        }

        if positions == 0 {
            return Err(SequenceError::invalid("evaluation needs at least one batch"));
        }
        let loss = loss_sum / positions as f64;
        if !loss.is_finite() {
            return Err(SequenceError::NumericInstability { step: self.steps, loss });
        }

        Ok(Evaluation {
            loss,
            accuracy: correct as f64 / positions as f64,
            positions,
        })
    }

    /// Freeze the current parameters for prediction.
    pub fn inferencer(&self, device: &B::Device) -> Inferencer<B::InnerBackend> {
        Inferencer::new(self.model.valid(), self.config.clone(), device.clone())
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub steps:       usize,
    pub first_loss:  f64,
    pub final_loss:  f64,
    pub final_eval:  Evaluation,
    /// First evaluation sequence with its true and predicted labels.
    pub demo_values: Vec<f64>,
    pub demo_labels: Vec<u8>,
    pub demo_pred:   Vec<u8>,
    /// Predicted probability of label 1 at each position.
    pub demo_prob:   Vec<f32>,
}

pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: SequenceDataset,
    val_dataset:   SequenceDataset,
    metrics:       Option<MetricsLogger>,
) -> Result<TrainReport> {
    let device = burn::backend::ndarray::NdArrayDevice::default();
    tracing::info!("Using NdArray device: {:?}", device);
    train_loop(cfg, train_dataset, val_dataset, metrics, device)
}

fn train_loop(
    cfg:           &TrainConfig,
    train_dataset: SequenceDataset,
    val_dataset:   SequenceDataset,
    metrics:       Option<MetricsLogger>,
    device:        burn::backend::ndarray::NdArrayDevice,
) -> Result<TrainReport> {
    let mini_batch = SequenceError::require_positive("mini_batch", cfg.mini_batch)?;
    let steps      = SequenceError::require_positive("steps", cfg.steps)?;
    let eval_every = SequenceError::require_positive("eval_every", cfg.eval_every)?;
    if train_dataset.len() < mini_batch {
        return Err(SequenceError::invalid(format!(
            "training set has {} sequences, fewer than one mini-batch of {}",
            train_dataset.len(), mini_batch
        ))
        .into());
    }

    // Held-out rows if there are enough, otherwise score on the training rows
    let eval_dataset = if val_dataset.len() >= mini_batch {
        val_dataset
    } else {
        tracing::warn!(
            "Validation set ({} rows) smaller than a mini-batch; evaluating on training rows",
            val_dataset.len()
        );
        train_dataset.clone()
    };
    let demo = eval_dataset
        .get(0)
        .ok_or_else(|| SequenceError::invalid("no rows to evaluate on"))?;
    let demo_rows: Vec<Vec<f64>> = (0..mini_batch)
        .filter_map(|i| eval_dataset.get(i))
        .map(|s| s.values)
        .collect();

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = SequenceClassifierConfig::new(cfg.seq_len)
        .with_hidden_units(cfg.hidden_units)
        .with_batch_size(Some(mini_batch))
        .with_output_mode(cfg.output_mode)
        .with_init_seed(cfg.seed);

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim = AdamConfig::new().with_epsilon(1e-8).init();
    let mut trainer: Trainer<TrainBackend, _> =
        Trainer::new(model_cfg, &device, optim, cfg.learning_rate)?;
    tracing::info!(
        "Model ready: hidden_units={}, mode={:?}, lr={}",
        cfg.hidden_units, cfg.output_mode, cfg.learning_rate
    );

    // ── Training data loader (AutodiffBackend, reshuffled every pass) ─────────
    type TrainItems = SequenceBatch<TrainBackend>;
    let train_loader = DataLoaderBuilder::<TrainBackend, SequenceSample, TrainItems>::new(SequenceBatcher::new())
        .batch_size(mini_batch)
        .shuffle(cfg.seed)
        .set_device(device.clone())
        .build(train_dataset);

    // ── Evaluation data loader (InnerBackend — no autodiff overhead) ──────────
    type EvalItems = SequenceBatch<InferBackend>;
    let eval_loader = DataLoaderBuilder::<InferBackend, SequenceSample, EvalItems>::new(SequenceBatcher::new())
        .batch_size(mini_batch)
        .set_device(device.clone())
        .build(eval_dataset);

    // The classifier expects exactly `mini_batch` rows, so the ragged tail is skipped
    let eval_batches: Vec<EvalItems> = eval_loader
        .iter()
        .filter(|b| b.dims()[0] == mini_batch)
        .collect();

    let mut first_loss = f64::NAN;
    let mut last_loss  = f64::NAN;
    let mut final_eval = None;
    let mut pass       = 0usize;

    'passes: loop {
        pass += 1;
        tracing::debug!("Training pass {}", pass);

        for batch in train_loader.iter() {
            if batch.dims()[0] != mini_batch {
                continue;
            }

            last_loss = trainer.train_step(&batch)?;
            let step  = trainer.steps();
            if step == 1 {
                first_loss = last_loss;
            }

            if step % eval_every == 0 || step == steps {
                let eval = trainer.evaluate(&eval_batches)?;
                println!(
                    "Step {:>5}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.1}%",
                    step, steps, last_loss, eval.loss, eval.accuracy * 100.0,
                );
                if let Some(logger) = &metrics {
                    logger.log(&StepMetrics::new(step, last_loss, eval.loss, eval.accuracy))?;
                }
                final_eval = Some(eval);
            }

            if step == steps {
                break 'passes;
            }
        }
    }

    let final_eval = match final_eval {
        Some(eval) => eval,
        None => trainer.evaluate(&eval_batches)?,
    };

    // ── Demo prediction on the first evaluation mini-batch ────────────────────
    let inferencer  = trainer.inferencer(&device);
    let predictions = inferencer.predict(&demo_rows)?;
    let confidence  = inferencer.positive_probabilities(&demo_rows)?;

    tracing::info!(
        "Training complete after {} steps over {} passes (phase {:?})",
        trainer.steps(), pass, trainer.phase()
    );
    Ok(TrainReport {
        steps:       trainer.steps(),
        first_loss,
        final_loss:  last_loss,
        final_eval,
        demo_values: demo.values,
        demo_labels: demo.labels,
        demo_pred:   predictions.into_iter().next().unwrap_or_default(),
        demo_prob:   confidence.into_iter().next().unwrap_or_default(),
    })
}
