use ndarray::{ArrayView1, ArrayView2};
use rand::Rng;
use rand::seq::SliceRandom;

/// Minimum impurity decrease for a split to be kept.
const MIN_GAIN: f64 = 1e-9;

/// Node of a fitted classification tree.
#[derive(Debug, Clone)]
pub enum TreeNode {
    Leaf {
        /// Class probabilities of the training rows that reached this leaf.
        distribution: Vec<f32>,
        n_samples: usize,
    },
    Split {
        feature_index: usize,
        /// Rows with `feature <= threshold` go left.
        threshold: f32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

#[cfg(test)]
impl TreeNode {
    pub(crate) fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Gini decision tree grown on a bootstrap sample.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    pub root: TreeNode,
}

impl DecisionTree {
    /// Walk to a leaf and return its class distribution.
    pub fn predict_proba_row(&self, row: ArrayView1<'_, f32>) -> &[f32] {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { distribution, .. } => return distribution,
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature_index] <= *threshold {
                        &**left
                    } else {
                        &**right
                    };
                }
            }
        }
    }
}

#[cfg(test)]
impl DecisionTree {
    pub(crate) fn depth(&self) -> usize {
        self.root.depth()
    }
}

/// Growth limits shared by every tree in a forest.
#[derive(Debug, Clone, Copy)]
pub(super) struct GrowParams {
    pub n_classes: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Features sampled per split before falling back to the rest.
    pub max_features: usize,
}

/// Grow a tree over the rows listed in `indices` (duplicates allowed).
pub(super) fn grow_tree<R: Rng>(
    features: ArrayView2<'_, f32>,
    labels: &[usize],
    indices: &mut [usize],
    params: GrowParams,
    rng: &mut R,
) -> DecisionTree {
    DecisionTree {
        root: grow_node(features, labels, indices, 0, params, rng),
    }
}

fn grow_node<R: Rng>(
    features: ArrayView2<'_, f32>,
    labels: &[usize],
    indices: &mut [usize],
    depth: usize,
    params: GrowParams,
    rng: &mut R,
) -> TreeNode {
    let counts = class_counts(labels, indices, params.n_classes);
    let is_pure = counts.iter().filter(|&&count| count > 0).count() <= 1;
    let depth_reached = params.max_depth.is_some_and(|max| depth >= max);
    if is_pure || depth_reached || indices.len() < params.min_samples_split {
        return leaf(&counts, indices.len());
    }

    let Some(split) = find_best_split(features, labels, indices, &counts, params, rng) else {
        return leaf(&counts, indices.len());
    };

    let split_at = partition(indices, |row| {
        features[[row, split.feature_index]] <= split.threshold
    });
    if split_at == 0 || split_at == indices.len() {
        return leaf(&counts, indices.len());
    }
    let (left_rows, right_rows) = indices.split_at_mut(split_at);
    let left = grow_node(features, labels, left_rows, depth + 1, params, rng);
    let right = grow_node(features, labels, right_rows, depth + 1, params, rng);
    TreeNode::Split {
        feature_index: split.feature_index,
        threshold: split.threshold,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn leaf(counts: &[usize], n_samples: usize) -> TreeNode {
    let total = n_samples.max(1) as f32;
    TreeNode::Leaf {
        distribution: counts.iter().map(|&count| count as f32 / total).collect(),
        n_samples,
    }
}

fn class_counts(labels: &[usize], indices: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &row in indices {
        counts[labels[row]] += 1;
    }
    counts
}

/// Gini impurity `1 - Σ p_i²` from class counts.
pub(super) fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    1.0 - counts
        .iter()
        .map(|&count| {
            let p = count as f64 / n;
            p * p
        })
        .sum::<f64>()
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature_index: usize,
    threshold: f32,
    gain: f64,
}

/// Try a random subset of features; keep looking through the others if none of
/// them separates the rows at all.
fn find_best_split<R: Rng>(
    features: ArrayView2<'_, f32>,
    labels: &[usize],
    indices: &[usize],
    counts: &[usize],
    params: GrowParams,
    rng: &mut R,
) -> Option<Split> {
    let parent_impurity = gini(counts, indices.len());
    let mut order: Vec<usize> = (0..features.ncols()).collect();
    order.shuffle(rng);

    let mut best: Option<Split> = None;
    for (visited, &feature_index) in order.iter().enumerate() {
        if visited >= params.max_features && best.is_some() {
            break;
        }
        let candidate = best_split_for_feature(
            features,
            labels,
            indices,
            feature_index,
            parent_impurity,
            params.n_classes,
        );
        if let Some(candidate) = candidate
            && best.is_none_or(|current| candidate.gain > current.gain)
        {
            best = Some(candidate);
        }
    }
    best
}

fn best_split_for_feature(
    features: ArrayView2<'_, f32>,
    labels: &[usize],
    indices: &[usize],
    feature_index: usize,
    parent_impurity: f64,
    n_classes: usize,
) -> Option<Split> {
    let mut values: Vec<(f32, usize)> = indices
        .iter()
        .map(|&row| (features[[row, feature_index]], labels[row]))
        .collect();
    values.sort_by(|a, b| a.0.total_cmp(&b.0));

    let total = values.len();
    let mut right_counts = vec![0usize; n_classes];
    for &(_, label) in &values {
        right_counts[label] += 1;
    }
    let mut left_counts = vec![0usize; n_classes];

    let mut best: Option<Split> = None;
    for i in 0..total.saturating_sub(1) {
        let (value, label) = values[i];
        left_counts[label] += 1;
        right_counts[label] -= 1;
        let next = values[i + 1].0;
        if next <= value {
            continue;
        }
        let n_left = i + 1;
        let n_right = total - n_left;
        let weighted = (n_left as f64 * gini(&left_counts, n_left)
            + n_right as f64 * gini(&right_counts, n_right))
            / total as f64;
        let gain = parent_impurity - weighted;
        if gain > MIN_GAIN && best.is_none_or(|current| gain > current.gain) {
            best = Some(Split {
                feature_index,
                threshold: value + (next - value) / 2.0,
                gain,
            });
        }
    }
    best
}

/// Reorder `indices` so rows matching `goes_left` come first; returns the boundary.
fn partition(indices: &mut [usize], goes_left: impl Fn(usize) -> bool) -> usize {
    let mut boundary = 0usize;
    for i in 0..indices.len() {
        if goes_left(indices[i]) {
            indices.swap(boundary, i);
            boundary += 1;
        }
    }
    boundary
}
