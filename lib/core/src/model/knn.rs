use super::SimilarityModel;
use crate::{FeatureStore, FeatureVector};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Exact nearest-neighbor lookup over the stored feature table.
///
/// Uses the Euclidean metric the feature space was standardized for.
/// Ties are broken by ascending row index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnnModel;

impl SimilarityModel for KnnModel {
    fn rank(
        &self,
        store: &FeatureStore,
        reference: &FeatureVector,
        exclude: Option<usize>,
        limit: usize,
    ) -> Vec<usize> {
        let mut scored: Vec<(OrderedFloat<f32>, usize)> = (0..store.len())
            .filter(|&i| Some(i) != exclude)
            .map(|i| {
                (
                    OrderedFloat(store.feature_vector(i).l2_distance(reference)),
                    i,
                )
            })
            .collect();
        scored.sort_unstable();
        scored.truncate(limit);
        scored.into_iter().map(|(_, i)| i).collect()
    }
}
