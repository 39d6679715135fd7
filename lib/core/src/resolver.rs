use crate::model::{ForestModel, KernelModel, KnnModel, ModelKind, SimilarityModel};
use crate::{Error, FeatureStore, Preferences, Result, SchoolRecord};
use std::sync::Arc;

/// Maximum number of schools in any recommendation.
pub const RESULT_LIMIT: usize = 5;

/// Default over-fetch pool for preference queries: how many ranked rows
/// to request from a model before intersecting with the candidate set.
pub const DEFAULT_CANDIDATE_POOL: usize = 10;

/// An ordered, deduplicated recommendation.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub model: ModelKind,
    pub schools: Vec<SchoolRecord>,
    /// Number of schools matching the preference constraints. `None` for
    /// by-name queries, where no constraint set exists.
    pub total_matches: Option<usize>,
}

/// The recommendation resolver.
///
/// Holds the read-only feature store and the three fitted models;
/// resolution is a single-pass, stateless pipeline per query, so one
/// resolver serves any number of concurrent requests.
pub struct Resolver {
    store: Arc<FeatureStore>,
    knn: KnnModel,
    forest: ForestModel,
    kernel: KernelModel,
    candidate_pool: usize,
}

impl Resolver {
    pub fn new(store: Arc<FeatureStore>, forest: ForestModel, kernel: KernelModel) -> Self {
        Self {
            store,
            knn: KnnModel,
            forest,
            kernel,
            candidate_pool: DEFAULT_CANDIDATE_POOL,
        }
    }

    /// Override the preference-query over-fetch pool. The pool must be
    /// comfortably larger than [`RESULT_LIMIT`] for the intersection
    /// step to deliver full results when enough candidates exist.
    #[must_use]
    pub fn with_candidate_pool(mut self, pool: usize) -> Self {
        self.candidate_pool = pool;
        self
    }

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    fn model(&self, kind: ModelKind) -> &dyn SimilarityModel {
        match kind {
            ModelKind::Knn => &self.knn,
            ModelKind::Forest => &self.forest,
            ModelKind::Kernel => &self.kernel,
        }
    }

    /// Schools similar to the named school.
    ///
    /// The queried school itself is never part of the result. A model
    /// may deliver fewer than [`RESULT_LIMIT`] rows (the ensemble's
    /// committee can be small); that is an accepted outcome here and no
    /// fallback applies.
    pub fn by_name(&self, name: &str, kind: ModelKind) -> Result<Recommendation> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("school name is required".to_string()));
        }
        let index = self.store.lookup_by_name(name)?;
        let reference = self.store.feature_vector(index);
        let rows = self
            .model(kind)
            .rank(&self.store, reference, Some(index), RESULT_LIMIT);
        Ok(Recommendation {
            model: kind,
            schools: self.collect(rows),
            total_matches: None,
        })
    }

    /// Schools matching the preference constraints, ranked by the chosen
    /// model around the candidates' centroid.
    ///
    /// Zero matching candidates is a normal outcome, not an error. The
    /// model ranks over the entire store (it has no awareness of the
    /// constraints); its output is intersected with the candidate set in
    /// rank order. If the intersection under-delivers, the ranking is
    /// discarded and the first [`RESULT_LIMIT`] candidates are returned
    /// in original row order.
    pub fn by_preferences(&self, prefs: &Preferences, kind: ModelKind) -> Result<Recommendation> {
        let candidates = self.store.filter(prefs);
        let reference = match self.store.mean_vector(&candidates) {
            Some(v) => v,
            None => {
                return Ok(Recommendation {
                    model: kind,
                    schools: Vec::new(),
                    total_matches: Some(0),
                })
            }
        };

        let pool = self.candidate_pool.min(self.store.len());
        let ranked = self.model(kind).rank(&self.store, &reference, None, pool);
        let mut rows: Vec<usize> = ranked
            .into_iter()
            .filter(|i| candidates.contains(i))
            .take(RESULT_LIMIT)
            .collect();
        if rows.len() < RESULT_LIMIT {
            // Ranked pool under-delivered; return the candidates
            // themselves, in row order.
            rows = candidates.iter().copied().take(RESULT_LIMIT).collect();
        }
        Ok(Recommendation {
            model: kind,
            schools: self.collect(rows),
            total_matches: Some(candidates.len()),
        })
    }

    fn collect(&self, rows: Vec<usize>) -> Vec<SchoolRecord> {
        rows.into_iter()
            .map(|i| self.store.record(i).clone())
            .collect()
    }
}
