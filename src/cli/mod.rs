// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
//
//   train — load vectors and data, train, plot, optionally predict

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "emw-textcnn",
    version,
    about = "Train a CNN text classifier on frozen pretrained word embeddings."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training with data from '{}'", args.train_file.display());

    let use_case = TrainUseCase::new(args.into());
    let outcome  = use_case.execute()?;

    println!("Training complete: {} epochs.", outcome.history.len());
    if let Some(last) = outcome.history.epochs.last() {
        println!(
            "Final: acc={:.4} val_acc={:.4} loss={:.4} val_loss={:.4}",
            last.binary_accuracy, last.val_binary_accuracy, last.loss, last.val_loss,
        );
    }
    for path in &outcome.chart_paths {
        println!("Chart: {}", path.display());
    }
    println!("Metrics: {}", outcome.csv_path.display());
    Ok(())
}
