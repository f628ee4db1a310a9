//! Evaluation metrics for classification models.

/// Square tally of true class (row) against predicted class (column).
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    pub n_classes: usize,
    /// Row-major, `truth * n_classes + predicted`.
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    /// Tally aligned truth/prediction pairs.
    pub fn from_predictions(n_classes: usize, truth: &[usize], predicted: &[usize]) -> Self {
        let mut cm = Self::new(n_classes);
        for (&t, &p) in truth.iter().zip(predicted) {
            cm.add(t, p);
        }
        cm
    }

    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerClassStats {
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
    /// Rows whose true class is this one.
    pub support: u32,
}

/// Per-class precision, recall and F1, indexed by class.
///
/// A class that was never predicted (or never present) scores 0 rather than NaN.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes;
    (0..k)
        .map(|class| {
            let hits = cm.get(class, class);
            let support: u32 = (0..k).map(|pred| cm.get(class, pred)).sum();
            let predicted: u32 = (0..k).map(|truth| cm.get(truth, class)).sum();
            let precision = ratio(hits, predicted);
            let recall = ratio(hits, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            PerClassStats {
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect()
}

/// Share of all tallied rows on the diagonal; 0 for an empty matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f32 {
    let correct: u64 = (0..cm.n_classes).map(|c| u64::from(cm.get(c, c))).sum();
    match cm.total() {
        0 => 0.0,
        total => correct as f32 / total as f32,
    }
}

fn ratio(numerator: u32, denominator: u32) -> f32 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f32 / denominator as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_counts_exact_matches() {
        let cm = ConfusionMatrix::from_predictions(3, &[0, 1, 2, 2], &[0, 2, 2, 2]);
        assert_eq!(cm.total(), 4);
        assert_eq!(cm.get(1, 2), 1);
        assert!((accuracy(&cm) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn empty_matrix_has_zero_accuracy() {
        assert_eq!(accuracy(&ConfusionMatrix::new(3)), 0.0);
    }

    #[test]
    fn out_of_range_entries_are_ignored() {
        let mut cm = ConfusionMatrix::new(2);
        cm.add(5, 0);
        assert_eq!(cm.total(), 0);
    }

    #[test]
    fn per_class_precision_recall() {
        let cm = ConfusionMatrix::from_predictions(3, &[0, 0, 1, 1, 2], &[0, 1, 1, 1, 0]);
        let stats = precision_recall_by_class(&cm);
        assert_eq!(stats.len(), 3);
        assert!((stats[0].precision - 0.5).abs() < 1e-6);
        assert!((stats[0].recall - 0.5).abs() < 1e-6);
        assert!((stats[1].precision - 2.0 / 3.0).abs() < 1e-6);
        assert!((stats[1].recall - 1.0).abs() < 1e-6);
        assert!((stats[1].f1 - 0.8).abs() < 1e-6);
        assert_eq!(stats[2].support, 1);
        assert_eq!(stats[2].f1, 0.0);
    }
}
