// ============================================================
// Layer 5 — Classification Metrics
// ============================================================
// Metrics computed on host-side probability vectors.
//
//   binary_accuracy  — share of predictions on the right side of 0.5
//   batch_f1         — F1 over a single mini-batch; averaged over
//                      an epoch it approximates, but is not, the
//                      dataset F1
//   ConfusionMatrix  — counts accumulated over a whole pass, the
//                      exact dataset-level F1
//   SampleMean       — sample-weighted running mean of batch values

/// Fraction of `probs` whose thresholded value matches `targets`.
/// A prediction is positive when strictly above 0.5.
pub fn binary_accuracy(targets: &[f32], probs: &[f32]) -> f64 {
    if targets.is_empty() {
        return 0.0;
    }
    let correct = targets
        .iter()
        .zip(probs)
        .filter(|&(&y, &p)| (p > 0.5) == (y > 0.5))
        .count();
    correct as f64 / targets.len() as f64
}

/// Round half to even, then clip to [0, 1].
fn round_clipped(x: f32) -> f32 {
    x.clamp(0.0, 1.0).round_ties_even()
}

/// F1 over one batch of targets and probabilities.
///
/// Returns exactly 0.0 when the batch holds no positive targets,
/// and 0.0 instead of NaN when nothing is predicted positive or
/// precision and recall are both zero.
pub fn batch_f1(targets: &[f32], probs: &[f32]) -> f64 {
    let true_pos: f32 = targets.iter().zip(probs).map(|(&y, &p)| round_clipped(y * p)).sum();
    let pred_pos: f32 = probs.iter().map(|&p| round_clipped(p)).sum();
    let actual:   f32 = targets.iter().map(|&y| round_clipped(y)).sum();

    if actual == 0.0 || pred_pos == 0.0 {
        return 0.0;
    }

    let precision = f64::from(true_pos / pred_pos);
    let recall    = f64::from(true_pos / actual);
    if precision + recall == 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / (precision + recall)
}

/// Prediction counts accumulated across many batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_pos:  usize,
    pub false_pos: usize,
    pub true_neg:  usize,
    pub false_neg: usize,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one batch, with `threshold` deciding the positive class
    pub fn update(&mut self, targets: &[f32], probs: &[f32], threshold: f32) {
        for (&y, &p) in targets.iter().zip(probs) {
            match (y > 0.5, p >= threshold) {
                (true,  true)  => self.true_pos  += 1,
                (false, true)  => self.false_pos += 1,
                (false, false) => self.true_neg  += 1,
                (true,  false) => self.false_neg += 1,
            }
        }
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_pos, self.true_pos + self.false_pos)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_pos, self.true_pos + self.false_neg)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Running mean where each batch value is weighted by its size.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleMean {
    sum:   f64,
    count: usize,
}

impl SampleMean {
    pub fn add(&mut self, value: f64, samples: usize) {
        self.sum   += value * samples as f64;
        self.count += samples;
    }

    /// NaN when nothing was added
    pub fn mean(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.sum / self.count as f64 }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        let acc = binary_accuracy(&[1.0, 0.0, 1.0, 0.0], &[0.9, 0.2, 0.4, 0.6]);
        assert!((acc - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_at_exactly_half_is_negative() {
        assert_eq!(binary_accuracy(&[0.0], &[0.5]), 1.0);
    }

    #[test]
    fn test_f1_zero_without_positive_targets() {
        assert_eq!(batch_f1(&[0.0, 0.0, 0.0], &[0.9, 0.8, 0.1]), 0.0);
    }

    #[test]
    fn test_f1_perfect() {
        assert!((batch_f1(&[1.0, 0.0, 1.0], &[0.9, 0.1, 0.7]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_f1_partial() {
        // tp = 1, predicted = 2, actual = 2 → p = r = 0.5
        let f1 = batch_f1(&[1.0, 1.0, 0.0], &[0.9, 0.2, 0.8]);
        assert!((f1 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_f1_no_predicted_positives_is_zero() {
        assert_eq!(batch_f1(&[1.0, 0.0], &[0.1, 0.2]), 0.0);
    }

    #[test]
    fn test_f1_rounds_half_to_even() {
        // 0.5 rounds to 0, so nothing counts as predicted positive
        assert_eq!(batch_f1(&[1.0], &[0.5]), 0.0);
    }

    #[test]
    fn test_confusion_matrix_accumulates() {
        let mut cm = ConfusionMatrix::new();
        cm.update(&[1.0, 0.0], &[0.9, 0.7], 0.5);
        cm.update(&[1.0, 0.0], &[0.1, 0.2], 0.5);
        assert_eq!(cm, ConfusionMatrix { true_pos: 1, false_pos: 1, true_neg: 1, false_neg: 1 });
        assert!((cm.f1() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_confusion_matrix_empty_is_zero() {
        assert_eq!(ConfusionMatrix::new().f1(), 0.0);
    }

    #[test]
    fn test_sample_mean_weights_by_size() {
        let mut m = SampleMean::default();
        m.add(1.0, 3);
        m.add(0.0, 1);
        assert!((m.mean() - 0.75).abs() < 1e-9);
        assert!(SampleMean::default().mean().is_nan());
    }
}
