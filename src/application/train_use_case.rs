// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Runs the training pipeline in order:
//
//   Step 1: Load pretrained vectors     (Layer 4 - data)
//   Step 2: Load + shuffle datasets     (Layer 4 - data)
//   Step 3: Tokenise and pad            (Layer 4 - data)
//   Step 4: Build the TextCnn           (Layer 5 - ml)
//   Step 5: Train with validation       (Layer 5 - ml)
//   Step 6: Render learning curves      (Layer 6 - infra)
//   Step 7: Optional prediction files   (Layer 5 - ml)
//
// Each step is a separate method taking what the previous step
// produced, so they can be exercised one at a time.

use anyhow::{Context, Result};
use burn::{module::AutodiffModule, tensor::backend::Backend};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, str::FromStr};

use crate::config;
use crate::data::{
    dataset::TextDataset,
    embeddings::EmbeddingLoader,
    loader::JsonlLoader,
    preprocessor::{PaddedDataset, SequencePreprocessor},
};
use crate::domain::{
    example::LabeledExample,
    traits::ExampleSource,
    vocabulary::{EmbeddingMatrix, Vocabulary},
};
use crate::infra::{
    metrics::{MetricsLogger, TrainingHistory},
    plot::render_history,
};
use crate::ml::{
    inferencer::Predictor,
    model::{TextCnn, TextCnnConfig},
    trainer::run_training,
    TrainBackend,
};

// ─── Prediction Target ───────────────────────────────────────────────────────
/// An unlabelled input file and where its predictions go,
/// written on the command line as `INPUT=OUTPUT`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionTarget {
    pub input:  PathBuf,
    pub output: PathBuf,
}

impl FromStr for PredictionTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((input, output)) if !input.is_empty() && !output.is_empty() => Ok(Self {
                input:  input.into(),
                output: output.into(),
            }),
            _ => Err(format!("expected INPUT=OUTPUT, got '{s}'")),
        }
    }
}

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub embeddings_path: PathBuf,
    pub train_path:      PathBuf,
    pub dev_path:        PathBuf,
    pub output_dir:      PathBuf,
    pub max_seq_len:     usize,
    pub embedding_dim:   usize,
    pub batch_size:      usize,
    pub epochs:          usize,
    pub lr:              f64,
    /// Fixes dataset and batch shuffling; None means a fresh random order
    pub seed:            Option<u64>,
    pub predictions:     Vec<PredictionTarget>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            embeddings_path: PathBuf::from(config::EMBEDDINGS_FILE_DIR).join(config::EMBEDDINGS_FILE_NAME),
            train_path:      PathBuf::from(config::TRAIN_FILE),
            dev_path:        PathBuf::from(config::DEV_FILE),
            output_dir:      PathBuf::from(config::OUTPUT_DIR),
            max_seq_len:     config::MAX_SEQUENCE_LENGTH,
            embedding_dim:   config::EMBEDDING_DIM,
            batch_size:      config::BATCH_SIZE,
            epochs:          config::EPOCHS,
            lr:              config::LEARNING_RATE,
            seed:            None,
            predictions:     Vec::new(),
        }
    }
}

/// What a finished run hands back to the caller.
pub struct TrainOutcome {
    pub history:     TrainingHistory,
    pub chart_paths: Vec<PathBuf>,
    pub csv_path:    PathBuf,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full pipeline end to end
    pub fn execute(&self) -> Result<TrainOutcome> {
        let cfg = &self.config;

        // ── Step 1: Pretrained vectors ────────────────────────────────────────
        let (vocab, matrix) = self.load_embeddings()?;

        // ── Step 2: Datasets (each shuffled once) ─────────────────────────────
        let train_examples = self.load_dataset(&cfg.train_path)?;
        let dev_examples   = self.load_dataset(&cfg.dev_path)?;

        // ── Step 3: Tokenise + pad ────────────────────────────────────────────
        let preprocessor = SequencePreprocessor::new(&vocab, cfg.max_seq_len);
        let train_padded = preprocessor.process(&train_examples);
        let dev_padded   = preprocessor.process(&dev_examples);

        // ── Step 4: Model ─────────────────────────────────────────────────────
        let model = self.build_model(&vocab, matrix)?;

        // ── Step 5: Train ─────────────────────────────────────────────────────
        let logger = MetricsLogger::new(&cfg.output_dir)?;
        let (model, history) = self.train(model, train_padded, dev_padded, Some(&logger))?;

        // ── Step 6: Curves ────────────────────────────────────────────────────
        let chart_paths = self.report(&history)?;

        // ── Step 7: Predictions ───────────────────────────────────────────────
        if !cfg.predictions.is_empty() {
            let predictor = Predictor::new(model.valid(), &preprocessor, cfg.batch_size);
            for target in &cfg.predictions {
                predictor
                    .predict_file(&target.input, &target.output)
                    .with_context(|| format!("Prediction for '{}' failed", target.input.display()))?;
            }
        }

        Ok(TrainOutcome {
            history,
            chart_paths,
            csv_path: logger.csv_path().to_path_buf(),
        })
    }

    pub fn load_embeddings(&self) -> Result<(Vocabulary, EmbeddingMatrix)> {
        tracing::info!("Loading embeddings from '{}'", self.config.embeddings_path.display());
        EmbeddingLoader::new(&self.config.embeddings_path, self.config.embedding_dim).load()
    }

    pub fn load_dataset(&self, path: &std::path::Path) -> Result<Vec<LabeledExample>> {
        JsonlLoader::new(path)
            .with_seed(self.config.seed)
            .load_all()
    }

    pub fn build_model(
        &self,
        vocab:  &Vocabulary,
        matrix: EmbeddingMatrix,
    ) -> Result<TextCnn<TrainBackend>> {
        let model_cfg = TextCnnConfig::new(vocab.rows(), self.config.embedding_dim, self.config.max_seq_len);
        let device    = <TrainBackend as Backend>::Device::default();
        let model     = model_cfg.init(matrix, &device)?;
        tracing::info!(
            "Model ready: {} embedding rows x {}, sequence length {}",
            vocab.rows(),
            self.config.embedding_dim,
            self.config.max_seq_len,
        );
        Ok(model)
    }

    pub fn train(
        &self,
        model:  TextCnn<TrainBackend>,
        train:  PaddedDataset,
        dev:    PaddedDataset,
        logger: Option<&MetricsLogger>,
    ) -> Result<(TextCnn<TrainBackend>, TrainingHistory)> {
        run_training(
            &self.config,
            model,
            TextDataset::from(train),
            TextDataset::from(dev),
            logger,
        )
    }

    pub fn report(&self, history: &TrainingHistory) -> Result<Vec<PathBuf>> {
        render_history(history, &self.config.output_dir)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const DIM: usize = 6;

    /// Toy vector file with four known words
    fn write_fixtures(dir: &Path) -> TrainConfig {
        let vectors = ["good", "movie", "bad", "film"]
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let row: Vec<String> = (0..DIM)
                    .map(|c| format!("{:.3}", ((i * DIM + c) as f32 * 0.37).sin()))
                    .collect();
                format!("{w} {}", row.join(" "))
            })
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(dir.join("vectors.vec"), vectors).unwrap();

        let records = "{\"text\":\"good movie\",\"label\":1}\n{\"text\":\"bad film\",\"label\":0}\n";
        fs::write(dir.join("train.json"), records).unwrap();
        fs::write(dir.join("dev.json"), records).unwrap();

        TrainConfig {
            embeddings_path: dir.join("vectors.vec"),
            train_path:      dir.join("train.json"),
            dev_path:        dir.join("dev.json"),
            output_dir:      dir.join("out"),
            embedding_dim:   DIM,
            epochs:          1,
            seed:            Some(3),
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_default_config_uses_constants() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.max_seq_len, 350);
        assert_eq!(cfg.embedding_dim, 300);
        assert_eq!(cfg.batch_size, 64);
        assert_eq!(cfg.epochs, 10);
        assert!((cfg.lr - 0.0005).abs() < 1e-12);
        assert!(cfg.embeddings_path.ends_with("word2vec-google-news.vec"));
    }

    #[test]
    fn test_prediction_target_parsing() {
        let t: PredictionTarget = "emw_test.json=task1_test.predict".parse().unwrap();
        assert_eq!(t.input, PathBuf::from("emw_test.json"));
        assert_eq!(t.output, PathBuf::from("task1_test.predict"));
        assert!("no-separator".parse::<PredictionTarget>().is_err());
        assert!("=out".parse::<PredictionTarget>().is_err());
    }

    #[test]
    fn test_preprocessing_stage_on_toy_data() {
        let dir = tempfile::tempdir().unwrap();
        let uc  = TrainUseCase::new(write_fixtures(dir.path()));

        let (vocab, _) = uc.load_embeddings().unwrap();
        let examples   = uc.load_dataset(&uc.config.train_path).unwrap();
        let padded     = SequencePreprocessor::new(&vocab, 350).process(&examples);

        assert_eq!(padded.sequences.len(), 2);
        assert_eq!(padded.labels.len(), 2);
        for (seq, ex) in padded.sequences.iter().zip(&examples) {
            assert_eq!(seq.len(), 350);
            assert!(seq[..348].iter().all(|&i| i == 0));
            assert!(seq[348..].iter().all(|&i| i >= 2));
            let expected: Vec<u32> = ex.text.split(' ').map(|w| vocab.lookup(w)).collect();
            assert_eq!(&seq[348..], expected.as_slice());
        }
    }

    #[test]
    fn test_end_to_end_one_epoch() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = write_fixtures(dir.path());

        fs::write(dir.path().join("test.json"), "{\"id\":7,\"text\":\"good film\"}\n").unwrap();
        cfg.predictions = vec![PredictionTarget {
            input:  dir.path().join("test.json"),
            output: dir.path().join("test.predict"),
        }];

        let outcome = TrainUseCase::new(cfg).execute().unwrap();

        assert_eq!(outcome.history.len(), 1);
        assert_eq!(outcome.chart_paths.len(), 2);
        assert!(outcome.chart_paths.iter().all(|p| p.exists()));
        assert!(outcome.csv_path.exists());

        let predictions = fs::read_to_string(dir.path().join("test.predict")).unwrap();
        assert!(predictions.starts_with("7\t"));
    }

    #[test]
    fn test_missing_embeddings_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = write_fixtures(dir.path());
        cfg.embeddings_path = dir.path().join("absent.vec");
        assert!(TrainUseCase::new(cfg).execute().is_err());
    }
}
