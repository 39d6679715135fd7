use super::SimilarityModel;
use crate::{FeatureStore, FeatureVector};
use serde::{Deserialize, Serialize};

/// A node in a fitted decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    /// Predicted row index for samples reaching this leaf.
    Leaf { row: usize },
}

/// One fitted CART tree. Leaves carry row-index labels, so a tree's
/// prediction is directly a school in the aligned tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    root: TreeNode,
}

impl DecisionTree {
    #[must_use]
    pub fn new(root: TreeNode) -> Self {
        Self { root }
    }

    pub fn predict(&self, sample: &FeatureVector) -> usize {
        let x = sample.as_slice();
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { row } => return *row,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }
}

/// Ensemble-vote model.
///
/// Each polled committee member predicts one most-similar school.
/// Votes equal to the excluded row or outside the store are dropped;
/// the remainder is deduplicated first-seen, so the first vote for a
/// school wins its rank position. Because the committee may be smaller
/// than the requested limit, this model can under-deliver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    trees: Vec<DecisionTree>,
    /// How many committee members to poll per query; `None` polls all.
    poll_limit: Option<usize>,
}

impl ForestModel {
    #[must_use]
    pub fn new(trees: Vec<DecisionTree>) -> Self {
        Self {
            trees,
            poll_limit: None,
        }
    }

    #[must_use]
    pub fn with_poll_limit(mut self, limit: usize) -> Self {
        self.poll_limit = Some(limit);
        self
    }

    /// Committee size.
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl SimilarityModel for ForestModel {
    fn rank(
        &self,
        store: &FeatureStore,
        reference: &FeatureVector,
        exclude: Option<usize>,
        limit: usize,
    ) -> Vec<usize> {
        let polled = self.poll_limit.unwrap_or(self.trees.len()).min(self.trees.len());
        let mut picks = Vec::new();
        for tree in &self.trees[..polled] {
            let row = tree.predict(reference);
            if Some(row) == exclude || row >= store.len() || picks.contains(&row) {
                continue;
            }
            picks.push(row);
            if picks.len() == limit {
                break;
            }
        }
        picks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchoolRecord;

    fn leaf(row: usize) -> DecisionTree {
        DecisionTree::new(TreeNode::Leaf { row })
    }

    fn store(n: usize) -> FeatureStore {
        let records = (0..n)
            .map(|i| SchoolRecord::new(format!("S{i}"), "Tempe", 85281))
            .collect();
        let features = (0..n)
            .map(|i| FeatureVector::new(vec![i as f32]))
            .collect();
        FeatureStore::new(records, features).unwrap()
    }

    #[test]
    fn test_split_walk() {
        let tree = DecisionTree::new(TreeNode::Split {
            feature: 0,
            threshold: 1.5,
            left: Box::new(TreeNode::Leaf { row: 0 }),
            right: Box::new(TreeNode::Leaf { row: 2 }),
        });
        assert_eq!(tree.predict(&FeatureVector::new(vec![1.0])), 0);
        assert_eq!(tree.predict(&FeatureVector::new(vec![2.0])), 2);
    }

    #[test]
    fn test_first_vote_wins_ordering() {
        // Committee votes [A, B, A, C] collapse to [A, B, C].
        let forest = ForestModel::new(vec![leaf(1), leaf(2), leaf(1), leaf(3)]);
        let store = store(4);
        let reference = FeatureVector::new(vec![0.0]);
        assert_eq!(
            forest.rank(&store, &reference, Some(0), 5),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_drops_excluded_and_unknown_votes() {
        let forest = ForestModel::new(vec![leaf(0), leaf(9), leaf(1)]);
        let store = store(3);
        let reference = FeatureVector::new(vec![0.0]);
        // row 9 does not resolve to a known row; row 0 is the query itself.
        assert_eq!(forest.rank(&store, &reference, Some(0), 5), vec![1]);
    }

    #[test]
    fn test_poll_limit_bounds_the_committee() {
        let forest =
            ForestModel::new(vec![leaf(1), leaf(2), leaf(3)]).with_poll_limit(2);
        let store = store(4);
        let reference = FeatureVector::new(vec![0.0]);
        assert_eq!(forest.rank(&store, &reference, None, 5), vec![1, 2]);
    }

    #[test]
    fn test_under_delivery_is_allowed() {
        let forest = ForestModel::new(vec![leaf(1)]);
        let store = store(3);
        let reference = FeatureVector::new(vec![0.0]);
        assert_eq!(forest.rank(&store, &reference, None, 5), vec![1]);
    }
}
