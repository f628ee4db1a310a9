use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use super::model::{GbdtStumpModel, Stump, softmax};
use crate::ml::{Classifier, FitError, check_fit_inputs};

/// Training hyperparameters for stump boosting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostingOptions {
    /// Number of boosting rounds.
    pub rounds: usize,
    /// Learning rate applied per round.
    pub learning_rate: f32,
    /// Number of bins used for split search.
    pub bins: usize,
}

impl Default for BoostingOptions {
    fn default() -> Self {
        Self {
            rounds: 100,
            learning_rate: 0.1,
            bins: 32,
        }
    }
}

impl BoostingOptions {
    pub(crate) fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            rounds: self.rounds.clamp(1, 10_000),
            learning_rate: if self.learning_rate.is_finite() && self.learning_rate > 0.0 {
                self.learning_rate
            } else {
                defaults.learning_rate
            },
            bins: self.bins.clamp(2, 256),
        }
    }
}

/// Stump-boosting classifier configuration.
#[derive(Debug, Clone, Default)]
pub struct GbdtStump {
    pub options: BoostingOptions,
}

impl GbdtStump {
    pub fn new(options: BoostingOptions) -> Self {
        Self { options }
    }
}

impl Classifier for GbdtStump {
    type Model = GbdtStumpModel;

    /// Train a multi-class stump-GBDT model using softmax gradient boosting.
    fn fit(
        &self,
        features: ArrayView2<'_, f32>,
        labels: &[usize],
        n_classes: usize,
    ) -> Result<GbdtStumpModel, FitError> {
        check_fit_inputs(features, labels, n_classes)?;
        let options = &self.options;
        let n = labels.len();
        let (mins, maxs) = compute_feature_min_max(features);
        let binned = bin_features(features, &mins, &maxs, options.bins);

        let priors = class_priors(labels, n_classes);
        let init_raw: Vec<f32> = priors.iter().map(|&p| p.max(1e-6).ln()).collect();
        let mut raw = vec![init_raw.clone(); n];

        let mut rounds_out: Vec<Vec<Stump>> = Vec::with_capacity(options.rounds);
        for _round in 0..options.rounds {
            let probs: Vec<Vec<f32>> = raw.iter().map(|r| softmax(r)).collect();
            let residuals = compute_residuals(labels, &probs, n_classes);

            let mut stumps_for_round = Vec::with_capacity(n_classes);
            for (class_idx, class_residuals) in residuals.iter().enumerate() {
                let stump = fit_best_stump_for_class(
                    &binned,
                    features,
                    &mins,
                    &maxs,
                    options.bins,
                    class_residuals,
                );
                for (i, row) in features.rows().into_iter().enumerate() {
                    raw[i][class_idx] += options.learning_rate * stump.predict(row);
                }
                stumps_for_round.push(stump);
            }
            rounds_out.push(stumps_for_round);
        }

        Ok(GbdtStumpModel {
            n_classes,
            learning_rate: options.learning_rate,
            init_raw,
            stumps: rounds_out,
        })
    }
}

fn class_priors(y: &[usize], n_classes: usize) -> Vec<f32> {
    let mut counts = vec![0usize; n_classes];
    for &label in y {
        if label < n_classes {
            counts[label] += 1;
        }
    }
    let total = y.len().max(1) as f32;
    counts.into_iter().map(|c| c as f32 / total).collect()
}

fn compute_residuals(y: &[usize], probs: &[Vec<f32>], n_classes: usize) -> Vec<Vec<f32>> {
    let mut residuals = vec![vec![0.0f32; y.len()]; n_classes];
    for (i, &yi) in y.iter().enumerate() {
        for (k, class_residuals) in residuals.iter_mut().enumerate() {
            let target = if yi == k { 1.0 } else { 0.0 };
            class_residuals[i] = target - probs[i][k];
        }
    }
    residuals
}

fn compute_feature_min_max(x: ArrayView2<'_, f32>) -> (Vec<f32>, Vec<f32>) {
    let feature_len = x.ncols();
    let mut mins = vec![f32::INFINITY; feature_len];
    let mut maxs = vec![f32::NEG_INFINITY; feature_len];
    for row in x.rows() {
        for (j, &v) in row.iter().enumerate() {
            if v.is_finite() {
                mins[j] = mins[j].min(v);
                maxs[j] = maxs[j].max(v);
            }
        }
    }
    for j in 0..feature_len {
        if !mins[j].is_finite() || !maxs[j].is_finite() {
            mins[j] = 0.0;
            maxs[j] = 0.0;
        }
        if mins[j] == maxs[j] {
            maxs[j] = mins[j] + 1.0;
        }
    }
    (mins, maxs)
}

/// Bin index per cell, `[rows][features]`.
fn bin_features(x: ArrayView2<'_, f32>, mins: &[f32], maxs: &[f32], bins: usize) -> Array2<u8> {
    let bins = bins.clamp(2, 256) as f32;
    Array2::from_shape_fn(x.dim(), |(i, j)| {
        let (min, max) = (mins[j], maxs[j]);
        let t = if max > min {
            ((x[[i, j]] - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (t * (bins - 1.0)).round() as u8
    })
}

fn fit_best_stump_for_class(
    binned: &Array2<u8>,
    x: ArrayView2<'_, f32>,
    mins: &[f32],
    maxs: &[f32],
    bins: usize,
    residuals: &[f32],
) -> Stump {
    let bins = bins.clamp(2, 256);

    let mut best = BestSplit::default();
    for feature_idx in 0..mins.len() {
        let split = best_split_for_feature(binned, residuals, feature_idx, bins);
        if split.score < best.score {
            best = split;
        }
    }

    let feature_idx = best.feature_index;
    let threshold = threshold_for_bin(mins[feature_idx], maxs[feature_idx], best.split_bin, bins);
    let (left_value, right_value) = leaf_means_for_threshold(x, residuals, feature_idx, threshold);
    Stump {
        feature_index: feature_idx,
        threshold,
        left_value,
        right_value,
    }
}

#[derive(Debug, Clone)]
struct BestSplit {
    score: f64,
    feature_index: usize,
    split_bin: usize,
}

impl Default for BestSplit {
    fn default() -> Self {
        Self {
            score: f64::INFINITY,
            feature_index: 0,
            split_bin: 0,
        }
    }
}

/// Lowest summed squared error of the residuals over all bin boundaries.
fn best_split_for_feature(
    binned: &Array2<u8>,
    residuals: &[f32],
    feature_idx: usize,
    bins: usize,
) -> BestSplit {
    let mut counts = vec![0u32; bins];
    let mut sums = vec![0f64; bins];
    let mut sums_sq = vec![0f64; bins];
    for (i, &b) in binned.column(feature_idx).iter().enumerate() {
        let b = (b as usize).min(bins - 1);
        let r = residuals[i] as f64;
        counts[b] += 1;
        sums[b] += r;
        sums_sq[b] += r * r;
    }
    let total_count: u32 = counts.iter().sum();
    if total_count == 0 {
        return BestSplit::default();
    }
    let total_sum: f64 = sums.iter().sum();
    let total_sum_sq: f64 = sums_sq.iter().sum();

    let mut best_score = f64::INFINITY;
    let mut best_bin = 0usize;

    let mut left_count = 0u32;
    let mut left_sum = 0f64;
    let mut left_sum_sq = 0f64;

    for split_bin in 0..(bins - 1) {
        left_count += counts[split_bin];
        left_sum += sums[split_bin];
        left_sum_sq += sums_sq[split_bin];
        let right_count = total_count - left_count;
        if left_count == 0 || right_count == 0 {
            continue;
        }
        let right_sum = total_sum - left_sum;
        let right_sum_sq = total_sum_sq - left_sum_sq;
        let left_sse = left_sum_sq - (left_sum * left_sum) / left_count as f64;
        let right_sse = right_sum_sq - (right_sum * right_sum) / right_count as f64;
        let score = left_sse + right_sse;
        if score < best_score {
            best_score = score;
            best_bin = split_bin;
        }
    }

    BestSplit {
        score: best_score,
        feature_index: feature_idx,
        split_bin: best_bin,
    }
}

/// Upper edge of `split_bin` in feature units.
fn threshold_for_bin(min: f32, max: f32, split_bin: usize, bins: usize) -> f32 {
    let step = (max - min) / (bins - 1) as f32;
    min + (split_bin as f32 + 0.5) * step
}

fn leaf_means_for_threshold(
    x: ArrayView2<'_, f32>,
    residuals: &[f32],
    feature_idx: usize,
    threshold: f32,
) -> (f32, f32) {
    let mut left_sum = 0.0f32;
    let mut left_count = 0u32;
    let mut right_sum = 0.0f32;
    let mut right_count = 0u32;
    for (i, &v) in x.column(feature_idx).iter().enumerate() {
        if v <= threshold {
            left_sum += residuals[i];
            left_count += 1;
        } else {
            right_sum += residuals[i];
            right_count += 1;
        }
    }
    let left_mean = if left_count == 0 {
        0.0
    } else {
        left_sum / left_count as f32
    };
    let right_mean = if right_count == 0 {
        0.0
    } else {
        right_sum / right_count as f32
    };
    (left_mean, right_mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::TrainedClassifier;
    use ndarray::array;

    #[test]
    fn learns_a_threshold_on_one_feature() {
        let x = array![[1.0f32, 0.0], [2.0, 0.0], [3.0, 0.0], [8.0, 0.0], [9.0, 0.0], [10.0, 0.0]];
        let y = [0, 0, 0, 1, 1, 1];
        let model = GbdtStump::new(BoostingOptions {
            rounds: 20,
            learning_rate: 0.5,
            bins: 16,
        })
        .fit(x.view(), &y, 2)
        .unwrap();
        assert_eq!(model.stumps.len(), 20);
        assert_eq!(model.predict(x.view()), y.to_vec());
        assert_eq!(model.stumps[0][0].feature_index, 0);
    }

    #[test]
    fn bin_thresholds_separate_adjacent_bins() {
        let x = array![[0.0f32], [10.0]];
        let binned = bin_features(x.view(), &[0.0], &[10.0], 11);
        assert_eq!(binned.column(0).to_vec(), vec![0u8, 10]);
        let threshold = threshold_for_bin(0.0, 10.0, 4, 11);
        assert!((threshold - 4.5).abs() < 1e-6);
    }

    #[test]
    fn constant_features_do_not_panic() {
        let x = array![[5.0f32], [5.0], [5.0]];
        let model = GbdtStump::default().fit(x.view(), &[0, 1, 2], 3).unwrap();
        let proba = model.predict_proba_row(x.row(0));
        assert!((proba.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn normalization_repairs_bad_options() {
        let options = BoostingOptions {
            rounds: 0,
            learning_rate: f32::NAN,
            bins: 1_000,
        }
        .normalized();
        assert_eq!(options.rounds, 1);
        assert_eq!(options.learning_rate, 0.1);
        assert_eq!(options.bins, 256);
    }
}
