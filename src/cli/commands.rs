// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `sample` and `train`, and their
// flags. The application layer never sees clap types: each Args
// struct converts into its use-case config.

use clap::{Args, Subcommand, ValueEnum};

use crate::application::{sample_use_case::SampleConfig, train_use_case::TrainConfig};
use crate::ml::model::OutputMode;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a batch and print its first sequence with labels
    Sample(SampleArgs),

    /// Train the recurrent classifier on a freshly sampled batch
    Train(TrainArgs),
}

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Length of every sequence
    #[arg(long, default_value_t = 10)]
    pub seq_len: usize,

    /// Number of sequences generated
    #[arg(long, default_value_t = 1000)]
    pub batch_size: usize,

    /// Random seed (must fit in 32 bits)
    #[arg(long, default_value_t = 20)]
    pub seed: u64,

    /// How many leading sequences to print
    #[arg(long, default_value_t = 1)]
    pub show: usize,
}

impl From<SampleArgs> for SampleConfig {
    fn from(a: SampleArgs) -> Self {
        SampleConfig {
            seq_len:    a.seq_len,
            batch_size: a.batch_size,
            seed:       a.seed,
            show:       a.show,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputModeArg {
    /// Classify every position from its own hidden state
    PerStep,
    /// Classify all positions from the final hidden state
    FinalState,
}

impl From<OutputModeArg> for OutputMode {
    fn from(a: OutputModeArg) -> Self {
        match a {
            OutputModeArg::PerStep    => OutputMode::PerStep,
            OutputModeArg::FinalState => OutputMode::FinalState,
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Length of every sequence
    #[arg(long, default_value_t = 10)]
    pub seq_len: usize,

    /// Number of sequences sampled before the train/validation split
    #[arg(long, default_value_t = 1000)]
    pub batch_size: usize,

    /// Size of the recurrent hidden state
    #[arg(long, default_value_t = 7)]
    pub hidden_units: usize,

    /// Adam base learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub learning_rate: f64,

    /// Seed for sampling, splitting, and weight initialisation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of optimizer steps
    #[arg(long, default_value_t = 200)]
    pub steps: usize,

    /// Sequences per optimizer step
    #[arg(long, default_value_t = 50)]
    pub mini_batch: usize,

    /// Evaluate on the validation rows every N steps
    #[arg(long, default_value_t = 20)]
    pub eval_every: usize,

    /// Fraction of sampled sequences used for training
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    /// How hidden states map to per-position predictions
    #[arg(long, value_enum, default_value_t = OutputModeArg::PerStep)]
    pub output_mode: OutputModeArg,

    /// Directory for metrics.csv (no metrics file when omitted)
    #[arg(long)]
    pub metrics_dir: Option<String>,

    /// JSON training config; replaces every flag above when given
    #[arg(long)]
    pub config: Option<String>,

    /// Write the effective training config to this JSON file
    #[arg(long)]
    pub save_config: Option<String>,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            seq_len:        a.seq_len,
            batch_size:     a.batch_size,
            hidden_units:   a.hidden_units,
            learning_rate:  a.learning_rate,
            seed:           a.seed,
            steps:          a.steps,
            mini_batch:     a.mini_batch,
            eval_every:     a.eval_every,
            train_fraction: a.train_fraction,
            output_mode:    a.output_mode.into(),
            metrics_dir:    a.metrics_dir,
        }
    }
}
