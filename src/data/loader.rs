// ============================================================
// Layer 4 — JSON Lines Loader
// ============================================================
// Reads one JSON object per line:
//
//   {"text": "good movie", "label": 1}
//   {"text": "bad film",   "label": 0}
//
// Labelled files are shuffled once on load; the order never
// changes after that. Unlabelled prediction inputs keep their
// file order so the output lines up with the input.
//
// Every malformed line is fatal. The error names the file and
// the 1-based line number.

use anyhow::{bail, Context, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::de::DeserializeOwned;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::domain::example::{LabeledExample, UnlabeledRecord};
use crate::domain::traits::ExampleSource;

/// Loads a labelled JSONL file.
/// Implements the ExampleSource trait from Layer 3.
pub struct JsonlLoader {
    path: PathBuf,
    /// Fixed shuffle seed; None draws from the thread RNG
    seed: Option<u64>,
}

impl JsonlLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

impl ExampleSource for JsonlLoader {
    fn load_all(&self) -> Result<Vec<LabeledExample>> {
        let records: Vec<(usize, LabeledExample)> = read_jsonl(&self.path)?;

        let mut examples = Vec::with_capacity(records.len());
        for (line_no, ex) in records {
            if ex.label > 1 {
                bail!(
                    "{}:{}: label must be 0 or 1, got {}",
                    self.path.display(),
                    line_no,
                    ex.label
                );
            }
            examples.push(ex);
        }

        match self.seed {
            Some(seed) => examples.shuffle(&mut StdRng::seed_from_u64(seed)),
            None       => examples.shuffle(&mut rand::thread_rng()),
        }

        let positives = examples.iter().filter(|e| e.label == 1).count();
        tracing::info!(
            "Loaded {} examples from '{}' ({} positive, {} negative)",
            examples.len(),
            self.path.display(),
            positives,
            examples.len() - positives,
        );
        if examples.is_empty() {
            tracing::warn!("'{}' contains no examples", self.path.display());
        }

        Ok(examples)
    }
}

/// Read `{id, text}` records in file order.
pub fn load_unlabeled(path: impl AsRef<Path>) -> Result<Vec<UnlabeledRecord>> {
    let records: Vec<UnlabeledRecord> = read_jsonl(path.as_ref())?
        .into_iter()
        .map(|(_, record)| record)
        .collect();
    tracing::debug!("Read {} records from '{}'", records.len(), path.as_ref().display());
    Ok(records)
}

/// Parse every non-blank line of `path` as a `T`, paired with its
/// 1-based line number. Blank lines are skipped but still counted.
fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<(usize, T)>> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open dataset '{}'", path.display()))?;

    let mut items = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("{}:{}: read failed", path.display(), idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed record", path.display(), idx + 1))?;
        items.push((idx + 1, item));
    }
    Ok(items)
}
