use ndarray::ArrayView1;

use crate::ml::TrainedClassifier;

/// Single-node decision tree used as a weak learner.
#[derive(Debug, Clone, PartialEq)]
pub struct Stump {
    /// Feature index used for the split.
    pub feature_index: usize,
    /// Threshold in feature units.
    pub threshold: f32,
    /// Prediction for `feature <= threshold`.
    pub left_value: f32,
    /// Prediction for `feature > threshold`.
    pub right_value: f32,
}

impl Stump {
    /// Predict the stump value for a feature row.
    pub fn predict(&self, row: ArrayView1<'_, f32>) -> f32 {
        let value = row.get(self.feature_index).copied().unwrap_or(0.0);
        if value <= self.threshold {
            self.left_value
        } else {
            self.right_value
        }
    }
}

/// Gradient-boosted decision stump model for multi-class classification.
#[derive(Debug, Clone)]
pub struct GbdtStumpModel {
    /// Number of classes (one stump per class per round).
    pub n_classes: usize,
    /// Learning rate applied to each stump prediction.
    pub learning_rate: f32,
    /// Initial raw logits before boosting rounds.
    pub init_raw: Vec<f32>,
    /// Shape: `[n_rounds][n_classes]`.
    pub stumps: Vec<Vec<Stump>>,
}

impl GbdtStumpModel {
    /// Predict raw logits for a feature row.
    pub fn predict_raw(&self, row: ArrayView1<'_, f32>) -> Vec<f32> {
        let mut raw = self.init_raw.clone();
        for round in &self.stumps {
            for (class_idx, stump) in round.iter().enumerate() {
                raw[class_idx] += self.learning_rate * stump.predict(row);
            }
        }
        raw
    }
}

impl TrainedClassifier for GbdtStumpModel {
    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba_row(&self, row: ArrayView1<'_, f32>) -> Vec<f32> {
        softmax(&self.predict_raw(row))
    }
}

/// Logits to probabilities, shifted by the max logit so `exp` cannot overflow.
pub fn softmax(raw: &[f32]) -> Vec<f32> {
    let max = raw.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = raw.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        exps.into_iter().map(|e| e / sum).collect()
    } else {
        vec![1.0 / raw.len().max(1) as f32; raw.len()]
    }
}
