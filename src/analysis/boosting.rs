//! Multiclass gradient boosting over small dense feature rows.
//!
//! Softmax objective, one regression tree per class per round, greedy exact splits scored
//! with the second-order gain. Deterministic: same rows in, same model out.

use {crate::config::BoosterParams, rayon::prelude::*};

const MIN_HESSIAN: f64 = 1e-16;
// Rounding noise must not count as an improvement.
const GAIN_EPS: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FitError {
    #[error("no training rows")]
    NoRows,

    #[error("{features} feature rows but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    /// `x[feature] < threshold` goes left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

#[derive(Debug, Clone, PartialEq)]
struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    fn predict<const F: usize>(&self, x: &[f64; F]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => idx = if x[feature] < threshold { left } else { right },
            }
        }
    }

    fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes[idx] {
                Node::Leaf(_) => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Grows one tree against fixed gradients/hessians.
struct TreeGrower<'a, const F: usize> {
    x: &'a [[f64; F]],
    grad: &'a [f64],
    hess: &'a [f64],
    params: &'a BoosterParams,
    nodes: Vec<Node>,
}

impl<'a, const F: usize> TreeGrower<'a, F> {
    fn grow(mut self) -> RegressionTree {
        let rows: Vec<usize> = (0..self.x.len()).collect();
        self.build(rows, 0);
        RegressionTree { nodes: self.nodes }
    }

    fn sums(&self, rows: &[usize]) -> (f64, f64) {
        rows.iter()
            .fold((0.0, 0.0), |(g, h), &r| (g + self.grad[r], h + self.hess[r]))
    }

    #[inline]
    fn score(&self, g: f64, h: f64) -> f64 {
        g * g / (h + self.params.lambda)
    }

    fn build(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let (g, h) = self.sums(&rows);
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf(0.0));

        if depth < self.params.max_depth {
            if let Some(split) = self.best_split(&rows, g, h) {
                let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                    .into_iter()
                    .partition(|&r| self.x[r][split.feature] < split.threshold);
                let left = self.build(left_rows, depth + 1);
                let right = self.build(right_rows, depth + 1);
                self.nodes[idx] = Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left,
                    right,
                };
                return idx;
            }
        }

        let weight = -g / (h + self.params.lambda);
        self.nodes[idx] = Node::Leaf(weight * self.params.learning_rate);
        idx
    }

    // First strictly-best candidate wins, scanning features in column order, thresholds ascending.
    fn best_split(&self, rows: &[usize], g_total: f64, h_total: f64) -> Option<SplitCandidate> {
        let parent = self.score(g_total, h_total);
        let mut best: Option<SplitCandidate> = None;

        for feature in 0..F {
            let mut sorted = rows.to_vec();
            sorted.sort_by(|&a, &b| self.x[a][feature].total_cmp(&self.x[b][feature]));

            let (mut g_left, mut h_left) = (0.0, 0.0);
            for pair in sorted.windows(2) {
                let (r, next) = (pair[0], pair[1]);
                g_left += self.grad[r];
                h_left += self.hess[r];

                let (v, v_next) = (self.x[r][feature], self.x[next][feature]);
                if v_next <= v {
                    continue;
                }

                let (g_right, h_right) = (g_total - g_left, h_total - h_left);
                let min_hessian = self.params.min_child_hessian;
                if h_left < min_hessian || h_right < min_hessian {
                    continue;
                }

                let gain =
                    0.5 * (self.score(g_left, h_left) + self.score(g_right, h_right) - parent);
                if gain <= self.params.min_split_gain + GAIN_EPS {
                    continue;
                }
                if best.is_none_or(|b| gain > b.gain) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: (v + v_next) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }
}

/// Fitted classifier. Labels are any ordered copyable type; they are sorted at fit time
/// and ties in prediction go to the smallest label.
#[derive(Debug, Clone)]
pub struct BoostedClassifier<L, const F: usize> {
    classes: Vec<L>,
    /// `trees[class][round]`
    trees: Vec<Vec<RegressionTree>>,
}

impl<L, const F: usize> BoostedClassifier<L, F>
where
    L: Copy + Ord + Send + Sync,
{
    pub fn fit(x: &[[f64; F]], y: &[L], params: &BoosterParams) -> Result<Self, FitError> {
        if x.len() != y.len() {
            return Err(FitError::LengthMismatch {
                features: x.len(),
                labels: y.len(),
            });
        }
        if x.is_empty() {
            return Err(FitError::NoRows);
        }

        let mut classes: Vec<L> = y.to_vec();
        classes.sort_unstable();
        classes.dedup();
        let n_classes = classes.len();

        // Class index per row (classes is sorted, so binary search always hits)
        let targets: Vec<usize> = y
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or_default())
            .collect();

        let mut margins = vec![vec![0.0; n_classes]; x.len()];
        let mut trees: Vec<Vec<RegressionTree>> =
            vec![Vec::with_capacity(params.n_rounds); n_classes];

        for _round in 0..params.n_rounds {
            let probs: Vec<Vec<f64>> = margins.iter().map(|m| softmax(m)).collect();

            let round_trees: Vec<RegressionTree> = (0..n_classes)
                .into_par_iter()
                .map(|k| {
                    let (grad, hess): (Vec<f64>, Vec<f64>) = probs
                        .iter()
                        .zip(&targets)
                        .map(|(p, &t)| {
                            let y_k = if t == k { 1.0 } else { 0.0 };
                            (p[k] - y_k, (2.0 * p[k] * (1.0 - p[k])).max(MIN_HESSIAN))
                        })
                        .unzip();

                    TreeGrower {
                        x,
                        grad: &grad,
                        hess: &hess,
                        params,
                        nodes: Vec::new(),
                    }
                    .grow()
                })
                .collect();

            for (row, m) in x.iter().zip(margins.iter_mut()) {
                for (k, tree) in round_trees.iter().enumerate() {
                    m[k] += tree.predict(row);
                }
            }
            for (k, tree) in round_trees.into_iter().enumerate() {
                trees[k].push(tree);
            }
        }

        log::info!(
            "BoostedClassifier::fit(): {} rows, {} classes, {} rounds, deepest tree {}",
            x.len(),
            n_classes,
            params.n_rounds,
            trees.iter().flatten().map(RegressionTree::depth).max().unwrap_or(0)
        );

        Ok(Self { classes, trees })
    }

    /// Raw summed margins, one per class (same order as `classes()`).
    pub fn margins(&self, x: &[f64; F]) -> Vec<f64> {
        self.trees
            .iter()
            .map(|class_trees| class_trees.iter().map(|t| t.predict(x)).sum())
            .collect()
    }

    pub fn predict(&self, x: &[f64; F]) -> L {
        let margins = self.margins(x);
        let mut best = 0;
        for (k, m) in margins.iter().enumerate().skip(1) {
            if *m > margins[best] {
                best = k;
            }
        }
        self.classes[best]
    }

    /// Distinct labels seen at fit time, ascending.
    pub fn classes(&self) -> &[L] {
        &self.classes
    }
}

fn softmax(margins: &[f64]) -> Vec<f64> {
    let max = margins.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = margins.iter().map(|m| (m - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}
