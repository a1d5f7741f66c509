// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and prints results. All work is
// delegated to Layer 2 (application).
//
//   1. `sample` — print the first generated sequence and labels
//   2. `train`  — train the classifier and print progress

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, SampleArgs, TrainArgs};

use crate::application::sample_use_case::{format_labels, format_values};

#[derive(Parser, Debug)]
#[command(
    name = "threshold-seq",
    version,
    about = "Label random sequences by a 0.5 threshold and train a recurrent network to reproduce the labels."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Sample(args) => run_sample(args),
            Commands::Train(args)  => run_train(args),
        }
    }
}

fn run_sample(args: SampleArgs) -> Result<()> {
    use crate::application::sample_use_case::SampleUseCase;

    let rows = SampleUseCase::new(args.into()).execute()?;
    for (values, labels) in rows.rows() {
        println!("{}", format_values(values));
        println!("{}", format_labels(labels));
    }
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};
    use crate::infra::config_file::{load_config, save_config};

    let save_path = args.save_config.clone();
    let config: TrainConfig = match &args.config {
        Some(path) => {
            tracing::info!("Reading training config from {}", path);
            load_config(path)?
        }
        None => args.into(),
    };
    if let Some(path) = save_path {
        save_config(&path, &config)?;
        tracing::info!("Training config written to {}", path);
    }

    let report = TrainUseCase::new(config).execute()?;

    println!(
        "\nLoss {:.4} → {:.4} over {} steps | val_acc={:.1}%",
        report.first_loss,
        report.final_loss,
        report.steps,
        report.final_eval.accuracy * 100.0,
    );
    println!("sequence:  {}", format_values(&report.demo_values));
    println!("labels:    {}", format_labels(&report.demo_labels));
    println!("predicted: {}", format_labels(&report.demo_pred));
    let probs: Vec<f64> = report.demo_prob.iter().map(|&p| f64::from(p)).collect();
    println!("p(1):      {}", format_values(&probs));
    Ok(())
}
