// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// One subcommand, `train`. Only file locations, the shuffle
// seed and prediction targets are flags; model size and
// optimiser settings come from the config constants.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::train_use_case::{PredictionTarget, TrainConfig};
use crate::config;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the CNN classifier and render its learning curves
    Train(TrainArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory containing the pretrained vector file
    #[arg(long, default_value = config::EMBEDDINGS_FILE_DIR)]
    pub embeddings_dir: PathBuf,

    /// Vector file name inside --embeddings-dir
    #[arg(long, default_value = config::EMBEDDINGS_FILE_NAME)]
    pub embeddings_file: String,

    /// Labelled training records, one JSON object per line
    #[arg(long, default_value = config::TRAIN_FILE)]
    pub train_file: PathBuf,

    /// Labelled validation records, one JSON object per line
    #[arg(long, default_value = config::DEV_FILE)]
    pub dev_file: PathBuf,

    /// Where accuracy.svg, loss.svg and metrics.csv are written
    #[arg(long, default_value = config::OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Seed for dataset and batch shuffling
    #[arg(long)]
    pub seed: Option<u64>,

    /// After training, score an unlabelled file: INPUT=OUTPUT (repeatable)
    #[arg(long = "predict", value_name = "INPUT=OUTPUT")]
    pub predictions: Vec<PredictionTarget>,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            embeddings_path: a.embeddings_dir.join(a.embeddings_file),
            train_path:      a.train_file,
            dev_path:        a.dev_file,
            output_dir:      a.output_dir,
            seed:            a.seed,
            predictions:     a.predictions,
            ..TrainConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::Cli;
    use super::*;
    use clap::Parser;

    fn train_config(args: &[&str]) -> TrainConfig {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Train(a) => a.into(),
        }
    }

    #[test]
    fn test_defaults() {
        let cfg = train_config(&["emw-textcnn", "train"]);
        assert_eq!(cfg.embeddings_path, PathBuf::from("EmbeddingsSets/word2vec-google-news.vec"));
        assert_eq!(cfg.train_path, PathBuf::from("emw_train.json"));
        assert_eq!(cfg.max_seq_len, 350);
        assert!(cfg.predictions.is_empty());
    }

    #[test]
    fn test_paths_and_predictions() {
        let cfg = train_config(&[
            "emw-textcnn", "train",
            "--embeddings-dir", "/data/vec",
            "--embeddings-file", "small.vec",
            "--seed", "11",
            "--predict", "emw_test.json=task1_test.predict",
            "--predict", "emw_china.json=china_test_task1.predict",
        ]);
        assert_eq!(cfg.embeddings_path, PathBuf::from("/data/vec/small.vec"));
        assert_eq!(cfg.seed, Some(11));
        assert_eq!(cfg.predictions.len(), 2);
        assert_eq!(cfg.predictions[1].output, PathBuf::from("china_test_task1.predict"));
    }

    #[test]
    fn test_bad_prediction_target_is_rejected() {
        assert!(Cli::try_parse_from(["emw-textcnn", "train", "--predict", "oops"]).is_err());
    }
}
