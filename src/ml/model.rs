use burn::{
    module::Param,
    nn::loss::CrossEntropyLossConfig,
    prelude::*,
    tensor::activation,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::error::SequenceError;

/// How hidden states are turned into per-position class logits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    /// Every hidden state h_t is projected to the logits for position t.
    PerStep,
    /// Only the last hidden state is used; it is projected to the logits
    /// of all positions at once.
    FinalState,
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct SequenceClassifierConfig {
    pub seq_len: usize,
    #[config(default = 7)]
    pub hidden_units: usize,
    #[config(default = 1)]
    pub input_features: usize,
    #[config(default = 2)]
    pub num_classes: usize,
    /// Fixed leading dimension of every batch, if any.
    pub batch_size: Option<usize>,
    #[config(default = "OutputMode::PerStep")]
    pub output_mode: OutputMode,
    #[config(default = 42)]
    pub init_seed: u64,
}

impl SequenceClassifierConfig {
    pub fn validate(&self) -> Result<(), SequenceError> {
        SequenceError::require_positive("seq_len", self.seq_len)?;
        SequenceError::require_positive("hidden_units", self.hidden_units)?;
        SequenceError::require_positive("input_features", self.input_features)?;
        if self.num_classes < 2 {
            return Err(SequenceError::invalid(format!(
                "num_classes must be at least 2, got {}", self.num_classes
            )));
        }
        if let Some(batch_size) = self.batch_size {
            SequenceError::require_positive("batch_size", batch_size)?;
        }
        Ok(())
    }

    /// Check a `[batch, seq_len, features]` input against the configured dimensions.
    pub fn check_input(&self, dims: [usize; 3]) -> Result<(), SequenceError> {
        let [batch, seq_len, features] = dims;
        match self.batch_size {
            Some(expected) => SequenceError::require_dim("batch", expected, batch)?,
            None => {
                SequenceError::require_positive("batch", batch)?;
            }
        }
        SequenceError::require_dim("seq_len", self.seq_len, seq_len)?;
        SequenceError::require_dim("input_features", self.input_features, features)
    }

    /// Allocate parameters. Kernels are Glorot-uniform and biases zero,
    /// drawn from `init_seed` so two inits of one config are identical.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<SequenceClassifier<B>, SequenceError> {
        self.validate()?;
        let mut rng = StdRng::seed_from_u64(self.init_seed);

        let cell = RecurrentCell {
            input_kernel:     glorot_uniform(&mut rng, self.input_features, self.hidden_units, device),
            recurrent_kernel: glorot_uniform(&mut rng, self.hidden_units, self.hidden_units, device),
            bias:             zeros(self.hidden_units, device),
        };

        let head_width = match self.output_mode {
            OutputMode::PerStep    => self.num_classes,
            OutputMode::FinalState => self.seq_len * self.num_classes,
        };
        let head = OutputHead {
            kernel: glorot_uniform(&mut rng, self.hidden_units, head_width, device),
            bias:   zeros(head_width, device),
        };

        tracing::debug!(
            "Initialised classifier: hidden={}, head_width={}, mode={:?}",
            self.hidden_units, head_width, self.output_mode
        );

        Ok(SequenceClassifier {
            cell,
            head,
            seq_len:        self.seq_len,
            input_features: self.input_features,
            num_classes:    self.num_classes,
        })
    }
}

fn glorot_uniform<B: Backend>(
    rng:     &mut StdRng,
    fan_in:  usize,
    fan_out: usize,
    device:  &B::Device,
) -> Param<Tensor<B, 2>> {
    let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
    let weights: Vec<f32> = (0..fan_in * fan_out)
        .map(|_| rng.gen_range(-limit..limit) as f32)
        .collect();
    Param::from_tensor(
        Tensor::<B, 1>::from_floats(weights.as_slice(), device).reshape([fan_in, fan_out]),
    )
}

fn zeros<B: Backend>(len: usize, device: &B::Device) -> Param<Tensor<B, 1>> {
    Param::from_tensor(Tensor::zeros([len], device))
}

/// Basic recurrent cell: h_t = tanh(x_t·W_x + h_{t-1}·W_h + b), h_0 = 0.
#[derive(Module, Debug)]
pub struct RecurrentCell<B: Backend> {
    pub input_kernel:     Param<Tensor<B, 2>>,
    pub recurrent_kernel: Param<Tensor<B, 2>>,
    pub bias:             Param<Tensor<B, 1>>,
}

impl<B: Backend> RecurrentCell<B> {
    pub fn hidden_units(&self) -> usize {
        self.recurrent_kernel.val().dims()[0]
    }

    /// One step: x [batch, features], h [batch, hidden] → [batch, hidden]
    pub fn step(&self, x: Tensor<B, 2>, h: Tensor<B, 2>) -> Tensor<B, 2> {
        let pre = x.matmul(self.input_kernel.val())
            + h.matmul(self.recurrent_kernel.val())
            + self.bias.val().unsqueeze::<2>();
        activation::tanh(pre)
    }

    /// inputs [batch, seq_len, features] → hidden states [batch, seq_len, hidden]
    pub fn forward(&self, inputs: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch, seq_len, features] = inputs.dims();
        let mut h = Tensor::<B, 2>::zeros([batch, self.hidden_units()], &inputs.device());
        let mut states = Vec::with_capacity(seq_len);
        for t in 0..seq_len {
            let x_t = inputs
                .clone()
                .slice([0..batch, t..t + 1, 0..features])
                .reshape([batch, features]);
            h = self.step(x_t, h);
            states.push(h.clone());
        }
        Tensor::stack::<3>(states, 1)
    }
}

/// Dense projection from hidden state to logits.
#[derive(Module, Debug)]
pub struct OutputHead<B: Backend> {
    pub kernel: Param<Tensor<B, 2>>,
    pub bias:   Param<Tensor<B, 1>>,
}

impl<B: Backend> OutputHead<B> {
    pub fn width(&self) -> usize {
        self.kernel.val().dims()[1]
    }

    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        x.matmul(self.kernel.val()) + self.bias.val().unsqueeze::<2>()
    }
}

#[derive(Module, Debug)]
pub struct SequenceClassifier<B: Backend> {
    pub cell:           RecurrentCell<B>,
    pub head:           OutputHead<B>,
    pub seq_len:        usize,
    pub input_features: usize,
    pub num_classes:    usize,
}

impl<B: Backend> SequenceClassifier<B> {
    /// The head width fixes the mode: one position's logits means per-step.
    /// With seq_len 1 the two modes compute the same thing.
    pub fn output_mode(&self) -> OutputMode {
        if self.head.width() == self.num_classes {
            OutputMode::PerStep
        } else {
            OutputMode::FinalState
        }
    }

    /// inputs: [batch, seq_len, features] → logits: [batch, seq_len, num_classes]
    pub fn forward(&self, inputs: Tensor<B, 3>) -> Result<Tensor<B, 3>, SequenceError> {
        let [batch, seq_len, features] = inputs.dims();
        SequenceError::require_positive("batch", batch)?;
        SequenceError::require_dim("seq_len", self.seq_len, seq_len)?;
        SequenceError::require_dim("input_features", self.input_features, features)?;

        let states = self.cell.forward(inputs); // [batch, seq_len, hidden]
        let hidden = self.cell.hidden_units();

        let logits = match self.output_mode() {
            OutputMode::PerStep => self
                .head
                .forward(states.reshape([batch * seq_len, hidden])),
            OutputMode::FinalState => self.head.forward(
                states
                    .slice([0..batch, seq_len - 1..seq_len, 0..hidden])
                    .reshape([batch, hidden]),
            ),
        };
        Ok(logits.reshape([batch, seq_len, self.num_classes]))
    }

    /// Mean cross-entropy over every (sequence, position) pair.
    /// targets: [batch, seq_len] class indices.
    pub fn forward_loss(
        &self,
        inputs:  Tensor<B, 3>,
        targets: Tensor<B, 2, Int>,
    ) -> Result<(Tensor<B, 1>, Tensor<B, 3>), SequenceError> {
        let [batch, seq_len, _] = inputs.dims();
        let [t_batch, t_len] = targets.dims();
        SequenceError::require_dim("target batch", batch, t_batch)?;
        SequenceError::require_dim("target seq_len", seq_len, t_len)?;

        let logits = self.forward(inputs)?;
        let positions = batch * seq_len;
        let ce = CrossEntropyLossConfig::new().init(&logits.device());
        let loss = ce.forward(
            logits.clone().reshape([positions, self.num_classes]),
            targets.reshape([positions]),
        );
        Ok((loss, logits))
    }
}

/// Highest-scoring class at each position: [batch, seq_len, C] → [batch, seq_len]
pub fn argmax_labels<B: Backend>(logits: Tensor<B, 3>) -> Tensor<B, 2, Int> {
    let [batch, seq_len, _] = logits.dims();
    logits.argmax(2).reshape([batch, seq_len])
}
