// ============================================================
// Layer 6 — Training Curve Reporter
// ============================================================
// Renders the two learning-curve charts as SVG files:
//
//   accuracy.svg — "Training and validation acc"
//   loss.svg     — "Training and validation loss"
//
// Training values are drawn as dots, validation values as a
// line, both in blue, against the epoch number on the x axis.

use anyhow::{anyhow, bail, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

use crate::infra::metrics::TrainingHistory;

const CHART_SIZE: (u32, u32) = (800, 600);

/// One chart: a title, the y-axis name and two series
pub struct Curve<'a> {
    pub title:     &'a str,
    pub y_label:   &'a str,
    pub train:     &'a [f64],
    pub train_tag: &'a str,
    pub val:       &'a [f64],
    pub val_tag:   &'a str,
}

/// Write accuracy.svg and loss.svg into `dir`; returns both paths.
pub fn render_history(history: &TrainingHistory, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if history.is_empty() {
        bail!("no epochs recorded, nothing to plot");
    }
    std::fs::create_dir_all(dir)?;

    let (acc, val_acc)   = (history.accuracy(), history.val_accuracy());
    let (loss, val_loss) = (history.loss(), history.val_loss());

    let acc_path = dir.join("accuracy.svg");
    render_curve(&acc_path, &Curve {
        title:     "Training and validation acc",
        y_label:   "Acc",
        train:     &acc,
        train_tag: "Training acc",
        val:       &val_acc,
        val_tag:   "Validation acc",
    })?;

    let loss_path = dir.join("loss.svg");
    render_curve(&loss_path, &Curve {
        title:     "Training and validation loss",
        y_label:   "Loss",
        train:     &loss,
        train_tag: "Training loss",
        val:       &val_loss,
        val_tag:   "Validation loss",
    })?;

    tracing::info!("Curves written to '{}' and '{}'", acc_path.display(), loss_path.display());
    Ok(vec![acc_path, loss_path])
}

pub fn render_curve(path: &Path, curve: &Curve<'_>) -> Result<()> {
    let plot_err = |e: &dyn std::fmt::Debug| anyhow!("Cannot draw '{}': {:?}", path.display(), e);

    let epochs       = curve.train.len().max(curve.val.len()).max(1);
    let (y_lo, y_hi) = y_range(curve.train.iter().chain(curve.val));

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| plot_err(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(curve.title, ("sans-serif", 24.0))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(1f64..(epochs as f64).max(2.0), y_lo..y_hi)
        .map_err(|e| plot_err(&e))?;

    chart
        .configure_mesh()
        .x_desc("Epochs")
        .y_desc(curve.y_label)
        .draw()
        .map_err(|e| plot_err(&e))?;

    chart
        .draw_series(
            points(curve.train).map(|p| Circle::new(p, 4, BLUE.filled())),
        )
        .map_err(|e| plot_err(&e))?
        .label(curve.train_tag)
        .legend(|(x, y)| Circle::new((x + 10, y), 4, BLUE.filled()));

    chart
        .draw_series(LineSeries::new(points(curve.val), &BLUE))
        .map_err(|e| plot_err(&e))?
        .label(curve.val_tag)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| plot_err(&e))?;

    root.present().map_err(|e| plot_err(&e))?;
    Ok(())
}

/// (epoch, value) pairs with epochs counted from 1, non-finite values dropped
fn points(values: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| ((i + 1) as f64, v))
}

/// Padded y-axis range over the finite values
fn y_range<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.1).max(0.01);
    (lo - pad, hi + pad)
}
