// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch loop over Burn DataLoaders with Adam and binary
// cross-entropy.
//
//   - Training runs on TrainBackend (Autodiff<NdArray>)
//   - model.valid() returns the model on EvalBackend (NdArray),
//     so the validation batcher is built for EvalBackend too
//   - The embedding table is frozen; only conv/dense weights
//     receive gradients
//   - Loss, accuracy and batch F1 are averaged per sample;
//     validation also accumulates a confusion matrix

use anyhow::{anyhow, bail, Result};
use burn::{
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::{activation::sigmoid, ElementConversion},
};

use crate::application::train_use_case::TrainConfig;
use crate::config::DECISION_THRESHOLD;
use crate::data::{batcher::TextBatcher, dataset::TextDataset};
use crate::infra::metrics::{EpochMetrics, MetricsLogger, TrainingHistory};
use crate::ml::metrics::{batch_f1, binary_accuracy, ConfusionMatrix, SampleMean};
use crate::ml::model::TextCnn;
use crate::ml::{EvalBackend, TrainBackend};

/// Train `model` for cfg.epochs epochs and return it with its history.
pub fn run_training(
    cfg:           &TrainConfig,
    model:         TextCnn<TrainBackend>,
    train_dataset: TextDataset,
    val_dataset:   TextDataset,
    logger:        Option<&MetricsLogger>,
) -> Result<(TextCnn<TrainBackend>, TrainingHistory)> {
    if train_dataset.is_empty() {
        bail!("training set is empty");
    }
    if val_dataset.is_empty() {
        tracing::warn!("Validation set is empty; validation metrics will be NaN");
    }

    let device = <TrainBackend as Backend>::Device::default();
    let seed   = cfg.seed.unwrap_or_else(rand::random);
    tracing::info!(
        "Training on {} samples, validating on {} (batch size {}, lr {}, {} epochs)",
        train_dataset.len(),
        val_dataset.len(),
        cfg.batch_size,
        cfg.lr,
        cfg.epochs,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = AdamConfig::new()
        .with_beta_1(0.9)
        .with_beta_2(0.999)
        .with_epsilon(1e-7)
        .init();

    // ── Data loaders ──────────────────────────────────────────────────────────
    // Training batches are reshuffled every epoch; validation order is fixed.
    // No worker threads: batches are built on the calling thread.
    let train_loader = DataLoaderBuilder::new(TextBatcher::<TrainBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(seed)
        .build(train_dataset);

    let val_loader = DataLoaderBuilder::new(TextBatcher::<EvalBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .build(val_dataset);

    let mut model   = model;
    let mut history = TrainingHistory::default();

    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut loss = SampleMean::default();
        let mut acc  = SampleMean::default();
        let mut f1   = SampleMean::default();

        for batch in train_loader.iter() {
            let n = batch.targets.len();
            let (batch_loss, logits) = model.loss(batch.token_ids, batch.labels);

            let probs = to_host(sigmoid(logits.detach()))?;
            loss.add(batch_loss.clone().into_scalar().elem::<f64>(), n);
            acc.add(binary_accuracy(&batch.targets, &probs), n);
            f1.add(batch_f1(&batch.targets, &probs), n);

            // Backward pass + Adam update
            let grads = batch_loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();

        let mut val_loss  = SampleMean::default();
        let mut val_acc   = SampleMean::default();
        let mut val_f1    = SampleMean::default();
        let mut confusion = ConfusionMatrix::new();

        for batch in val_loader.iter() {
            let n = batch.targets.len();
            let (batch_loss, logits) = model_valid.loss(batch.token_ids, batch.labels);

            let probs = to_host(sigmoid(logits))?;
            val_loss.add(batch_loss.into_scalar().elem::<f64>(), n);
            val_acc.add(binary_accuracy(&batch.targets, &probs), n);
            val_f1.add(batch_f1(&batch.targets, &probs), n);
            confusion.update(&batch.targets, &probs, DECISION_THRESHOLD);
        }

        let metrics = EpochMetrics {
            epoch,
            loss:                loss.mean(),
            binary_accuracy:     acc.mean(),
            f1_score:            f1.mean(),
            val_loss:            val_loss.mean(),
            val_binary_accuracy: val_acc.mean(),
            val_f1_score:        val_f1.mean(),
            val_f1_exact:        confusion.f1(),
        };

        tracing::info!(
            "Epoch {:>2}/{} | loss={:.4} acc={:.4} f1={:.4} | val_loss={:.4} val_acc={:.4} val_f1={:.4} (exact {:.4})",
            epoch,
            cfg.epochs,
            metrics.loss,
            metrics.binary_accuracy,
            metrics.f1_score,
            metrics.val_loss,
            metrics.val_binary_accuracy,
            metrics.val_f1_score,
            metrics.val_f1_exact,
        );

        if let Some(logger) = logger {
            logger.log(&metrics)?;
        }
        history.push(metrics);
    }

    if let Some(best) = history.best_epoch() {
        tracing::info!("Lowest validation loss {:.4} at epoch {}", best.val_loss, best.epoch);
    }
    tracing::info!("Training complete!");
    Ok((model, history))
}

/// Copy a 1-D float tensor to the host.
pub fn to_host<B: Backend>(t: Tensor<B, 1>) -> Result<Vec<f32>> {
    t.into_data()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("Cannot read tensor data: {e:?}"))
}
