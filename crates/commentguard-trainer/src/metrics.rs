//! Evaluation metrics for the held-out test split

use commentguard_core::{LABEL_COUNT, TOXICITY_LABELS};

/// Binary classification metrics for one category
#[derive(Debug, Clone, Copy)]
pub struct LabelMetrics {
    pub accuracy: f32,
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
}

/// Per-category metrics plus exact-match accuracy over all six labels
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub per_label: [LabelMetrics; LABEL_COUNT],
    pub exact_match_accuracy: f32,
}

/// Compare binary predictions against ground truth.
///
/// Degenerate denominators score zero rather than dividing by zero, the
/// usual convention for rare labels on a small test split.
pub fn evaluate(predictions: &[[u8; LABEL_COUNT]], truth: &[[u8; LABEL_COUNT]]) -> EvaluationReport {
    assert_eq!(predictions.len(), truth.len(), "prediction/truth row mismatch");
    let n = predictions.len() as f32;

    let per_label = std::array::from_fn(|label_idx| {
        let mut tp = 0.0_f32;
        let mut fp = 0.0_f32;
        let mut fn_ = 0.0_f32;
        let mut tn = 0.0_f32;

        for (pred, actual) in predictions.iter().zip(truth) {
            match (pred[label_idx], actual[label_idx]) {
                (1, 1) => tp += 1.0,
                (1, 0) => fp += 1.0,
                (0, 1) => fn_ += 1.0,
                _ => tn += 1.0,
            }
        }

        let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
        let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        LabelMetrics {
            accuracy: (tp + tn) / n,
            precision,
            recall,
            f1,
        }
    });

    let exact_matches = predictions
        .iter()
        .zip(truth)
        .filter(|(pred, actual)| pred == actual)
        .count() as f32;

    EvaluationReport {
        per_label,
        exact_match_accuracy: exact_matches / n,
    }
}

impl EvaluationReport {
    /// Render the report as the training run's summary table.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{:<20} {:>10} {:>10} {:>10} {:>10}\n",
            "category", "accuracy", "precision", "recall", "f1"
        ));
        for (label, m) in TOXICITY_LABELS.iter().zip(&self.per_label) {
            out.push_str(&format!(
                "{:<20} {:>10.4} {:>10.4} {:>10.4} {:>10.4}\n",
                label, m.accuracy, m.precision, m.recall, m.f1
            ));
        }
        out.push_str(&format!(
            "\nexact-match accuracy: {:.4}\n",
            self.exact_match_accuracy
        ));
        out
    }
}
