//! Regression trees grown on first/second order gradient statistics
//!
//! Splits are found by exact greedy search over sorted feature values.
//! A sample goes left when its value is `<= threshold` or missing (NaN),
//! both while growing and while predicting.

use crate::features::NUM_FEATURES;

/// One dense feature vector
pub type Sample = [f64; NUM_FEATURES];

/// Growth limits and regularisation for a single tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: usize,
    /// L2 penalty on leaf weights
    pub reg_lambda: f64,
    /// Minimum hessian sum in each child
    pub min_child_weight: f64,
    /// Shrinkage applied to every leaf weight
    pub learning_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
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

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// A fitted regression tree; node 0 is the root
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

fn goes_left(value: f64, threshold: f64) -> bool {
    value.is_nan() || value <= threshold
}

impl RegressionTree {
    /// Grow a tree on `rows` using only the columns listed in `features`.
    pub fn fit(
        samples: &[Sample],
        gradients: &[f64],
        hessians: &[f64],
        rows: &[usize],
        features: &[usize],
        params: &TreeParams,
    ) -> Self {
        let mut builder = TreeBuilder {
            samples,
            gradients,
            hessians,
            features,
            params,
            nodes: Vec::new(),
        };
        builder.grow(rows.to_vec(), 0);

        Self {
            nodes: builder.nodes,
        }
    }

    /// Leaf value reached by `sample`
    pub fn predict(&self, sample: &Sample) -> f64 {
        let mut node_idx = 0usize;
        loop {
            match &self.nodes[node_idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node_idx = if goes_left(sample[*feature], *threshold) {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Number of split nodes per feature
    pub fn split_counts(&self) -> [usize; NUM_FEATURES] {
        let mut counts = [0; NUM_FEATURES];
        for node in &self.nodes {
            if let Node::Split { feature, .. } = node {
                counts[*feature] += 1;
            }
        }
        counts
    }

    pub fn num_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Longest root-to-leaf path, counted in splits
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

struct TreeBuilder<'a> {
    samples: &'a [Sample],
    gradients: &'a [f64],
    hessians: &'a [f64],
    features: &'a [usize],
    params: &'a TreeParams,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn sums(&self, rows: &[usize]) -> (f64, f64) {
        rows.iter().fold((0.0, 0.0), |(g, h), &r| {
            (g + self.gradients[r], h + self.hessians[r])
        })
    }

    fn score(&self, g: f64, h: f64) -> f64 {
        g * g / (h + self.params.reg_lambda)
    }

    fn leaf_value(&self, g: f64, h: f64) -> f64 {
        let denom = h + self.params.reg_lambda;
        if denom <= 0.0 {
            return 0.0;
        }
        -g / denom * self.params.learning_rate
    }

    /// Push a node for `rows` and return its index
    fn grow(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let (g, h) = self.sums(&rows);
        let index = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: self.leaf_value(g, h),
        });

        if depth >= self.params.max_depth || rows.len() < 2 {
            return index;
        }

        if let Some(best) = self.best_split(&rows, g, h) {
            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                .into_iter()
                .partition(|&r| goes_left(self.samples[r][best.feature], best.threshold));

            let left = self.grow(left_rows, depth + 1);
            let right = self.grow(right_rows, depth + 1);
            self.nodes[index] = Node::Split {
                feature: best.feature,
                threshold: best.threshold,
                left,
                right,
            };
        }

        index
    }

    fn best_split(&self, rows: &[usize], g_total: f64, h_total: f64) -> Option<SplitCandidate> {
        let parent_score = self.score(g_total, h_total);
        let min_child = self.params.min_child_weight;
        let mut best: Option<SplitCandidate> = None;

        for &feature in self.features {
            let mut present: Vec<(f64, usize)> = Vec::with_capacity(rows.len());
            let (mut g_left, mut h_left) = (0.0, 0.0);
            for &r in rows {
                let value = self.samples[r][feature];
                if value.is_nan() {
                    g_left += self.gradients[r];
                    h_left += self.hessians[r];
                } else {
                    present.push((value, r));
                }
            }
            present.sort_by(|a, b| a.0.total_cmp(&b.0));

            for i in 0..present.len().saturating_sub(1) {
                let (current, r) = present[i];
                g_left += self.gradients[r];
                h_left += self.hessians[r];

                let next = present[i + 1].0;
                if current == next {
                    continue;
                }

                let g_right = g_total - g_left;
                let h_right = h_total - h_left;
                if h_left < min_child || h_right < min_child {
                    continue;
                }

                let gain = 0.5
                    * (self.score(g_left, h_left) + self.score(g_right, h_right) - parent_score);
                if !gain.is_finite() || gain <= 0.0 {
                    continue;
                }

                if best.map_or(true, |b| gain > b.gain) {
                    let mut threshold = current + (next - current) / 2.0;
                    if threshold >= next {
                        threshold = current;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(max_depth: usize) -> TreeParams {
        TreeParams {
            max_depth,
            reg_lambda: 0.0,
            min_child_weight: 1.0,
            learning_rate: 1.0,
        }
    }

    fn sample(x: f64) -> Sample {
        [x, 0.0, 0.0, 0.0, 0.0, 0.0]
    }

    #[test]
    fn test_single_split_separates_groups() {
        let samples = vec![sample(1.0), sample(2.0), sample(10.0), sample(11.0)];
        // gradients of squared error at prediction 0 for targets 5, 5, 20, 20
        let gradients = vec![-5.0, -5.0, -20.0, -20.0];
        let hessians = vec![1.0; 4];

        let tree = RegressionTree::fit(
            &samples,
            &gradients,
            &hessians,
            &[0, 1, 2, 3],
            &[0],
            &params(1),
        );

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.num_leaves(), 2);
        assert_relative_eq!(tree.predict(&sample(0.0)), 5.0);
        assert_relative_eq!(tree.predict(&sample(50.0)), 20.0);
        assert_eq!(tree.split_counts(), [1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_constant_gradients_make_a_leaf() {
        let samples = vec![sample(1.0), sample(2.0), sample(3.0)];
        let tree = RegressionTree::fit(
            &samples,
            &[-1.0, -1.0, -1.0],
            &[1.0, 1.0, 1.0],
            &[0, 1, 2],
            &[0],
            &params(6),
        );

        assert_eq!(tree.num_leaves(), 1);
        assert_eq!(tree.split_counts(), [0; NUM_FEATURES]);
    }

    #[test]
    fn test_missing_values_go_left() {
        let samples = vec![sample(f64::NAN), sample(1.0), sample(10.0)];
        let tree = RegressionTree::fit(
            &samples,
            &[-4.0, -4.0, -30.0],
            &[1.0; 3],
            &[0, 1, 2],
            &[0],
            &params(1),
        );

        assert_relative_eq!(tree.predict(&sample(f64::NAN)), 4.0);
        assert_relative_eq!(tree.predict(&sample(10.0)), 30.0);
    }

    #[test]
    fn test_depth_limit() {
        let samples: Vec<Sample> = (0..16).map(|i| sample(i as f64)).collect();
        let gradients: Vec<f64> = (0..16).map(|i| -(i as f64).powi(2)).collect();
        let rows: Vec<usize> = (0..16).collect();

        let tree = RegressionTree::fit(&samples, &gradients, &[1.0; 16], &rows, &[0], &params(2));

        assert!(tree.depth() <= 2);
        assert!(tree.num_leaves() <= 4);
    }
}
