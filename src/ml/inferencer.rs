// ============================================================
// Layer 5 — Predictor
// ============================================================
// Scores texts with the freshly trained model and writes
// prediction files:
//
//   <id>\t<0|1>
//
// one line per input record, in input order. The model is the
// in-memory result of this run; nothing is loaded from disk.

use anyhow::{Context, Result};
use burn::prelude::*;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::config::DECISION_THRESHOLD;
use crate::data::{batcher::ids_to_tensor, loader::load_unlabeled, preprocessor::SequencePreprocessor};
use crate::ml::model::TextCnn;
use crate::ml::trainer::to_host;
use crate::ml::EvalBackend;

pub struct Predictor<'a> {
    model:        TextCnn<EvalBackend>,
    preprocessor: &'a SequencePreprocessor<'a>,
    batch_size:   usize,
    device:       <EvalBackend as Backend>::Device,
}

impl<'a> Predictor<'a> {
    pub fn new(
        model:        TextCnn<EvalBackend>,
        preprocessor: &'a SequencePreprocessor<'a>,
        batch_size:   usize,
    ) -> Self {
        Self {
            model,
            preprocessor,
            batch_size: batch_size.max(1),
            device:     Default::default(),
        }
    }

    /// Probability of label 1 for each text
    pub fn predict_texts(&self, texts: &[String]) -> Result<Vec<f32>> {
        let mut probs = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.batch_size) {
            let rows: Vec<Vec<u32>> = chunk
                .iter()
                .map(|t| self.preprocessor.encode_padded(t))
                .collect();
            let ids = ids_to_tensor::<EvalBackend>(&rows, &self.device);
            probs.extend(to_host(self.model.forward(ids))?);
        }

        Ok(probs)
    }

    /// Thresholded labels for each text
    pub fn predict_labels(&self, texts: &[String]) -> Result<Vec<u8>> {
        Ok(self
            .predict_texts(texts)?
            .into_iter()
            .map(|p| u8::from(p >= DECISION_THRESHOLD))
            .collect())
    }

    /// Score every `{id, text}` record in `input` and write `id\tlabel` lines to `output`.
    pub fn predict_file(&self, input: &Path, output: &Path) -> Result<usize> {
        let records = load_unlabeled(input)?;
        let texts: Vec<String> = records.iter().map(|r| r.text.clone()).collect();
        let labels = self.predict_labels(&texts)?;

        let file = File::create(output)
            .with_context(|| format!("Cannot create prediction file '{}'", output.display()))?;
        let mut out = BufWriter::new(file);
        for (record, label) in records.iter().zip(&labels) {
            writeln!(out, "{}\t{}", record.id_string(), label)?;
        }
        out.flush()?;

        tracing::info!(
            "Wrote {} predictions for '{}' to '{}'",
            labels.len(),
            input.display(),
            output.display(),
        );
        Ok(labels.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocabulary::{EmbeddingMatrix, Vocabulary};
    use crate::ml::model::TextCnnConfig;

    fn fixture() -> (Vocabulary, TextCnn<EvalBackend>) {
        let mut vocab  = Vocabulary::new();
        let mut matrix = EmbeddingMatrix::new(3);
        for (w, row) in [("good", [0.3f32, 0.1, 0.2]), ("bad", [-0.2, 0.4, 0.0])] {
            vocab.push(w);
            matrix.push_row(&row);
        }
        let model = TextCnnConfig::new(vocab.rows(), 3, 60)
            .init(matrix, &<EvalBackend as Backend>::Device::default())
            .unwrap();
        (vocab, model)
    }

    #[test]
    fn test_one_probability_per_text() {
        let (vocab, model) = fixture();
        let prep      = SequencePreprocessor::new(&vocab, 60);
        let predictor = Predictor::new(model, &prep, 2);

        let texts: Vec<String> = ["good", "bad", "good bad", "unknown words"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let probs = predictor.predict_texts(&texts).unwrap();
        assert_eq!(probs.len(), 4);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_prediction_file_lines_follow_input() {
        let (vocab, model) = fixture();
        let prep      = SequencePreprocessor::new(&vocab, 60);
        let predictor = Predictor::new(model, &prep, 64);

        let dir   = tempfile::tempdir().unwrap();
        let input = dir.path().join("test.json");
        std::fs::write(
            &input,
            "{\"id\":\"r1\",\"text\":\"good\"}\n{\"id\":2,\"text\":\"bad\"}\n",
        )
        .unwrap();
        let output = dir.path().join("test.predict");

        assert_eq!(predictor.predict_file(&input, &output).unwrap(), 2);
        let text  = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0] == "r1\t0" || lines[0] == "r1\t1");
        assert!(lines[1].starts_with("2\t"));
    }
}
