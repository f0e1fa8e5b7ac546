//! Gradient-boosted regression trees over dense feature vectors.
//!
//! Squared-error boosting: the base score is the target mean, and each round
//! fits a depth-limited regression tree to the current residuals. Trees are
//! stored as flat node arrays with index links, which keeps the fitted model
//! cheap to serialize and walk.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hyperparameters for [`Gbrt::fit`].
#[derive(Debug, Clone)]
pub struct GbrtConfig {
    /// Number of boosting rounds (trees).
    pub rounds: usize,
    /// Shrinkage applied to each tree's contribution.
    pub learning_rate: f64,
    /// Maximum tree depth; depth 1 is a stump.
    pub max_depth: usize,
    /// Minimum number of samples a leaf may hold.
    pub min_samples_leaf: usize,
    /// Fraction of rows drawn (without replacement) for each round.
    pub subsample: f64,
    /// Seed for the row subsampler.
    pub seed: u64,
}

impl Default for GbrtConfig {
    fn default() -> Self {
        Self {
            rounds: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_leaf: 1,
            subsample: 1.0,
            seed: 42,
        }
    }
}

/// One node of a fitted tree. Children are indices into the flat node array.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A single fitted regression tree.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Fits a tree to `targets` restricted to `indices`, greedily choosing
    /// the split with the largest squared-error reduction at each node.
    fn fit(matrix: &[Vec<f64>], targets: &[f64], indices: Vec<usize>, config: &GbrtConfig) -> Self {
        let mut nodes = Vec::new();
        grow(&mut nodes, matrix, targets, indices, 0, config);
        Self { nodes }
    }

    /// Walks the tree for one feature vector. Rows with a feature value at or
    /// below the threshold go left.
    fn predict(&self, row: &[f64]) -> f64 {
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Recursively grows the tree, returning the index of the node it created.
fn grow(
    nodes: &mut Vec<Node>,
    matrix: &[Vec<f64>],
    targets: &[f64],
    indices: Vec<usize>,
    depth: usize,
    config: &GbrtConfig,
) -> usize {
    let value = subset_mean(targets, &indices);
    let min_leaf = config.min_samples_leaf.max(1);

    if depth >= config.max_depth || indices.len() < 2 * min_leaf {
        nodes.push(Node::Leaf { value });
        return nodes.len() - 1;
    }

    let Some(split) = best_split(matrix, targets, &indices, min_leaf) else {
        nodes.push(Node::Leaf { value });
        return nodes.len() - 1;
    };

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| matrix[i][split.feature] <= split.threshold);

    // Placeholder so the children land after this slot in the array.
    let slot = nodes.len();
    nodes.push(Node::Leaf { value });
    let left = grow(nodes, matrix, targets, left_rows, depth + 1, config);
    let right = grow(nodes, matrix, targets, right_rows, depth + 1, config);
    nodes[slot] = Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left,
        right,
    };
    slot
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
}

/// Scans every feature for the threshold with the largest gain in
/// sum-of-squares, or `None` when no split improves on the parent.
///
/// Ties keep the earliest feature and threshold, so fitting is deterministic
/// for a fixed row order.
fn best_split(
    matrix: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    min_leaf: usize,
) -> Option<SplitCandidate> {
    let total: f64 = indices.iter().map(|&i| targets[i]).sum();
    let count = indices.len() as f64;
    let parent_score = total * total / count;
    let feature_count = matrix.first().map_or(0, Vec::len);

    let mut best: Option<SplitCandidate> = None;
    let mut best_gain = 1e-12;
    let mut order: Vec<usize> = indices.to_vec();

    for feature in 0..feature_count {
        order.sort_by(|&a, &b| matrix[a][feature].total_cmp(&matrix[b][feature]));

        let mut left_sum = 0.0;
        for k in 0..order.len() - 1 {
            left_sum += targets[order[k]];
            let here = matrix[order[k]][feature];
            let next = matrix[order[k + 1]][feature];
            if here == next {
                continue;
            }
            let left_count = k + 1;
            let right_count = order.len() - left_count;
            if left_count < min_leaf || right_count < min_leaf {
                continue;
            }
            let right_sum = total - left_sum;
            let gain = left_sum * left_sum / left_count as f64
                + right_sum * right_sum / right_count as f64
                - parent_score;
            if gain > best_gain {
                best_gain = gain;
                best = Some(SplitCandidate {
                    feature,
                    threshold: (here + next) / 2.0,
                });
            }
        }
    }
    best
}

fn subset_mean(targets: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64
}

/// Shuffles indices in place using a simple LCG-driven Fisher-Yates pass.
fn shuffle_indices(indices: &mut [usize], rng_state: &mut u64) {
    for i in (1..indices.len()).rev() {
        // LCG: state = (a * state + c) mod m
        *rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let j = ((*rng_state >> 33) as usize) % (i + 1);
        indices.swap(i, j);
    }
}

/// A fitted gradient-boosted ensemble.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Gbrt {
    base_score: f64,
    shrinkage: f64,
    trees: Vec<RegressionTree>,
}

impl Gbrt {
    /// Fits the ensemble on a dense feature matrix.
    ///
    /// Fitting is deterministic for a given configuration and row order; the
    /// seed only drives the optional per-round row subsample.
    pub fn fit(matrix: &[Vec<f64>], targets: &[f64], config: &GbrtConfig) -> Self {
        let n = targets.len();
        let base_score = if n == 0 {
            0.0
        } else {
            targets.iter().sum::<f64>() / n as f64
        };
        let mut model = Self {
            base_score,
            shrinkage: config.learning_rate,
            trees: Vec::with_capacity(config.rounds),
        };
        if n == 0 {
            return model;
        }

        let sample_count = ((n as f64) * config.subsample).round() as usize;
        let sample_count = sample_count.clamp(1, n);

        let mut predictions = vec![base_score; n];
        let mut residuals = vec![0.0; n];
        let mut rng_state = config.seed;

        for round in 0..config.rounds {
            for i in 0..n {
                residuals[i] = targets[i] - predictions[i];
            }

            let mut indices: Vec<usize> = (0..n).collect();
            if sample_count < n {
                shuffle_indices(&mut indices, &mut rng_state);
                indices.truncate(sample_count);
                indices.sort_unstable();
            }

            let tree = RegressionTree::fit(matrix, &residuals, indices, config);
            for (i, row) in matrix.iter().enumerate() {
                predictions[i] += model.shrinkage * tree.predict(row);
            }
            model.trees.push(tree);

            if (round + 1) % 10 == 0 || round + 1 == config.rounds {
                let train_mse = targets
                    .iter()
                    .zip(&predictions)
                    .map(|(&y, &p)| (y - p) * (y - p))
                    .sum::<f64>()
                    / n as f64;
                debug!(round = round + 1, train_mse, "boosting progress");
            }
        }
        model
    }

    /// Predicts a single feature vector.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut score = self.base_score;
        for tree in &self.trees {
            score += self.shrinkage * tree.predict(row);
        }
        score
    }

    /// Predicts every row of a feature matrix.
    pub fn predict(&self, matrix: &[Vec<f64>]) -> Vec<f64> {
        matrix.iter().map(|row| self.predict_row(row)).collect()
    }

    /// Number of fitted trees.
    pub fn rounds(&self) -> usize {
        self.trees.len()
    }

    /// Mean squared error of this model over a labeled matrix.
    pub fn mse(&self, matrix: &[Vec<f64>], targets: &[f64]) -> f64 {
        if targets.is_empty() {
            return 0.0;
        }
        matrix
            .iter()
            .zip(targets)
            .map(|(row, &y)| {
                let p = self.predict_row(row);
                (y - p) * (y - p)
            })
            .sum::<f64>()
            / targets.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-random matrix for fitting tests.
    fn synthetic_data(rows: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
        let mut state: u64 = 7;
        let mut matrix = Vec::with_capacity(rows);
        let mut targets = Vec::with_capacity(rows);
        for _ in 0..rows {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let a = ((state >> 33) % 100) as f64;
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let b = ((state >> 33) % 7) as f64;
            matrix.push(vec![a, b]);
            targets.push(2.0 * a + b * b);
        }
        (matrix, targets)
    }

    #[test]
    fn test_two_level_target_is_learned() {
        let mut matrix = Vec::new();
        let mut targets = Vec::new();
        for i in 0..60 {
            let x = f64::from(i % 2);
            matrix.push(vec![x]);
            targets.push(10.0 * x);
        }

        let model = Gbrt::fit(&matrix, &targets, &GbrtConfig::default());

        assert!(model.predict_row(&[0.0]).abs() < 0.01);
        assert!((model.predict_row(&[1.0]) - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (matrix, targets) = synthetic_data(120);
        let config = GbrtConfig::default();

        let first = Gbrt::fit(&matrix, &targets, &config);
        let second = Gbrt::fit(&matrix, &targets, &config);

        assert_eq!(first, second);
        assert_eq!(first.predict(&matrix), second.predict(&matrix));
    }

    #[test]
    fn test_subsampled_fit_reproduces_for_same_seed() {
        let (matrix, targets) = synthetic_data(120);
        let config = GbrtConfig {
            subsample: 0.5,
            ..GbrtConfig::default()
        };

        let first = Gbrt::fit(&matrix, &targets, &config);
        let second = Gbrt::fit(&matrix, &targets, &config);

        assert_eq!(first.predict(&matrix), second.predict(&matrix));
        assert_eq!(first.rounds(), 100);
    }

    #[test]
    fn test_boosting_beats_the_mean_baseline() {
        let (matrix, targets) = synthetic_data(200);
        let mean = targets.iter().sum::<f64>() / targets.len() as f64;
        let baseline_mse = targets
            .iter()
            .map(|&y| (y - mean) * (y - mean))
            .sum::<f64>()
            / targets.len() as f64;

        let model = Gbrt::fit(&matrix, &targets, &GbrtConfig::default());

        assert!(model.mse(&matrix, &targets) < baseline_mse / 2.0);
    }

    #[test]
    fn test_constant_target_predicts_the_constant() {
        let matrix: Vec<Vec<f64>> = (0..60).map(|i| vec![f64::from(i)]).collect();
        let targets = vec![7.0; 60];

        let model = Gbrt::fit(&matrix, &targets, &GbrtConfig::default());

        assert!((model.predict_row(&[123.0]) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_shuffle_preserves_elements() {
        let mut indices: Vec<usize> = (0..10).collect();
        let original = indices.clone();
        let mut state = 42;

        shuffle_indices(&mut indices, &mut state);

        assert_ne!(indices, original, "Shuffle should change order");
        indices.sort_unstable();
        assert_eq!(indices, original, "Shuffle should preserve elements");
    }
}
