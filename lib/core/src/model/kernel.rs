use super::SimilarityModel;
use crate::{FeatureStore, FeatureVector};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Probabilistic ranking via an RBF kernel over the feature space.
///
/// Each stored row is its own class; affinity to a row is
/// `exp(-gamma * d^2)`, normalized into a probability distribution over
/// all rows. Rows rank by descending probability, ties by ascending row
/// index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelModel {
    gamma: f32,
}

impl KernelModel {
    #[must_use]
    pub fn new(gamma: f32) -> Self {
        Self { gamma }
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Class-probability estimates for every stored row, in row order.
    pub fn probabilities(&self, store: &FeatureStore, reference: &FeatureVector) -> Vec<f32> {
        let scores: Vec<f32> = (0..store.len())
            .map(|i| {
                let d = store.feature_vector(i).l2_distance(reference);
                (-self.gamma * d * d).exp()
            })
            .collect();
        let total: f32 = scores.iter().sum();
        if total > 0.0 {
            scores.into_iter().map(|s| s / total).collect()
        } else {
            scores
        }
    }
}

impl SimilarityModel for KernelModel {
    fn rank(
        &self,
        store: &FeatureStore,
        reference: &FeatureVector,
        exclude: Option<usize>,
        limit: usize,
    ) -> Vec<usize> {
        let mut ranked: Vec<(Reverse<OrderedFloat<f32>>, usize)> = self
            .probabilities(store, reference)
            .into_iter()
            .enumerate()
            .filter(|&(i, _)| Some(i) != exclude)
            .map(|(i, p)| (Reverse(OrderedFloat(p)), i))
            .collect();
        ranked.sort_unstable();
        ranked.truncate(limit);
        ranked.into_iter().map(|(_, i)| i).collect()
    }
}
