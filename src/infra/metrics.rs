// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Keeps the per-epoch training history and appends each epoch
// to a CSV file.
//
// Metrics recorded per epoch:
//   - loss / val_loss                        mean binary cross-entropy
//   - binary_accuracy / val_binary_accuracy  threshold 0.5
//   - f1_score / val_f1_score                mean of per-batch F1
//   - val_f1_exact                           F1 over the whole dev set
//
// Output file: <output_dir>/metrics.csv
//
//   epoch,loss,binary_accuracy,f1_score,val_loss,val_binary_accuracy,val_f1_score,val_f1_exact
//   1,0.693100,0.512000,0.402100,0.690200,0.530000,0.381000,0.455000

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

const CSV_HEADER: &str =
    "epoch,loss,binary_accuracy,f1_score,val_loss,val_binary_accuracy,val_f1_score,val_f1_exact";

/// One row of metrics for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Starts at 1
    pub epoch: usize,

    pub loss:            f64,
    pub binary_accuracy: f64,
    pub f1_score:        f64,

    pub val_loss:            f64,
    pub val_binary_accuracy: f64,
    pub val_f1_score:        f64,

    /// Dataset-level F1 from confusion counts over the full dev pass
    pub val_f1_exact: f64,
}

/// Ordered epoch metrics from one training run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub epochs: Vec<EpochMetrics>,
}

impl TrainingHistory {
    pub fn push(&mut self, m: EpochMetrics) {
        self.epochs.push(m);
    }

    pub fn len(&self) -> usize { self.epochs.len() }

    pub fn is_empty(&self) -> bool { self.epochs.is_empty() }

    pub fn accuracy(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.binary_accuracy).collect()
    }

    pub fn val_accuracy(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.val_binary_accuracy).collect()
    }

    pub fn loss(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.loss).collect()
    }

    pub fn val_loss(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.val_loss).collect()
    }

    /// Epoch with the lowest validation loss
    pub fn best_epoch(&self) -> Option<&EpochMetrics> {
        self.epochs
            .iter()
            .filter(|m| !m.val_loss.is_nan())
            .min_by(|a, b| a.val_loss.total_cmp(&b.val_loss))
    }
}

/// Appends epoch metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create `dir` if needed and start a fresh CSV with its header.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "{CSV_HEADER}")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            m.epoch,
            m.loss,
            m.binary_accuracy,
            m.f1_score,
            m.val_loss,
            m.val_binary_accuracy,
            m.val_f1_score,
            m.val_f1_exact,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.loss,
            m.val_loss,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(epoch: usize, val_loss: f64) -> EpochMetrics {
        EpochMetrics {
            epoch,
            loss:                0.7,
            binary_accuracy:     0.5,
            f1_score:            0.4,
            val_loss,
            val_binary_accuracy: 0.55,
            val_f1_score:        0.3,
            val_f1_exact:        0.35,
        }
    }

    #[test]
    fn test_history_series_and_best() {
        let mut h = TrainingHistory::default();
        h.push(metrics(1, 0.9));
        h.push(metrics(2, 0.6));
        h.push(metrics(3, 0.8));
        assert_eq!(h.val_loss(), vec![0.9, 0.6, 0.8]);
        assert_eq!(h.accuracy().len(), 3);
        assert_eq!(h.best_epoch().map(|m| m.epoch), Some(2));
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&metrics(1, 0.5)).unwrap();
        logger.log(&metrics(2, 0.4)).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[2].starts_with("2,0.700000,"));
    }
}
