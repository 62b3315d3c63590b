//! CART regression tree.
//!
//! Splits greedily on the threshold that most reduces the summed squared
//! error of the targets, placing thresholds halfway between adjacent
//! distinct feature values. Leaves predict the mean target of their samples.

use rand::Rng;

use crate::features::FeatureMatrix;

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` considers all of them
    pub max_features: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    feature: usize,
    threshold: f64,
}

/// A fitted regression tree, stored as a flat node arena rooted at index 0.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Grow a tree over the rows named by `sample` (duplicates allowed).
    ///
    /// `sample` must be non-empty and `y` must have one entry per row of `x`.
    pub fn fit<R: Rng + ?Sized>(
        x: &FeatureMatrix,
        y: &[f64],
        sample: Vec<usize>,
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(x, y, sample, 0, params, rng);
        tree
    }

    fn grow<R: Rng + ?Sized>(
        &mut self,
        x: &FeatureMatrix,
        y: &[f64],
        indices: Vec<usize>,
        depth: usize,
        params: &TreeParams,
        rng: &mut R,
    ) -> usize {
        let node_id = self.nodes.len();
        let value = mean(&indices, y);
        self.nodes.push(Node::Leaf { value });

        if depth >= params.max_depth
            || indices.len() < params.min_samples_split
            || indices.len() < 2 * params.min_samples_leaf
            || is_pure(&indices, y)
        {
            return node_id;
        }

        let Some(split) = best_split(x, y, &indices, params, rng) else {
            return node_id;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| x.get(i, split.feature) <= split.threshold);

        let left = self.grow(x, y, left_rows, depth + 1, params, rng);
        let right = self.grow(x, y, right_rows, depth + 1, params, rng);
        self.nodes[node_id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_id
    }

    /// Predict one encoded row.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Longest root-to-leaf edge count.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }
}

fn mean(indices: &[usize], y: &[f64]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64
}

fn is_pure(indices: &[usize], y: &[f64]) -> bool {
    let first = y[indices[0]];
    indices.iter().all(|&i| y[i] == first)
}

fn candidate_features<R: Rng + ?Sized>(
    n_features: usize,
    max_features: Option<usize>,
    rng: &mut R,
) -> Vec<usize> {
    match max_features {
        Some(k) if k < n_features => {
            let mut picked = rand::seq::index::sample(rng, n_features, k).into_vec();
            picked.sort_unstable();
            picked
        }
        _ => (0..n_features).collect(),
    }
}

fn best_split<R: Rng + ?Sized>(
    x: &FeatureMatrix,
    y: &[f64],
    indices: &[usize],
    params: &TreeParams,
    rng: &mut R,
) -> Option<Candidate> {
    let n = indices.len();
    let total: f64 = indices.iter().map(|&i| y[i]).sum();
    let parent_score = total * total / n as f64;
    let leaf = params.min_samples_leaf.max(1);

    let mut best: Option<Candidate> = None;
    let mut best_score = parent_score;

    for feature in candidate_features(x.n_cols(), params.max_features, rng) {
        let mut pairs: Vec<(f64, f64)> = indices
            .iter()
            .map(|&i| (x.get(i, feature), y[i]))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left_sum = 0.0;
        for split_at in 1..n {
            left_sum += pairs[split_at - 1].1;
            let (lo, hi) = (pairs[split_at - 1].0, pairs[split_at].0);
            if lo == hi || split_at < leaf || n - split_at < leaf {
                continue;
            }

            let n_left = split_at as f64;
            let n_right = (n - split_at) as f64;
            let right_sum = total - left_sum;
            // larger means lower summed squared error across both sides
            let score = left_sum * left_sum / n_left + right_sum * right_sum / n_right;

            if score > best_score + 1e-12 {
                let mid = lo + (hi - lo) / 2.0;
                // keep the threshold strictly below the upper value
                let threshold = if mid < hi { mid } else { lo };
                best_score = score;
                best = Some(Candidate { feature, threshold });
            }
        }
    }

    best
}
