//! The three interchangeable similarity strategies.
//!
//! Every strategy answers the same question through one trait: given a
//! reference point in feature space, which stored rows are most similar?
//! The resolver stays strategy-agnostic; all filtering, truncation and
//! fallback policy lives there, not here.

mod forest;
mod kernel;
mod knn;

pub use forest::{DecisionTree, ForestModel, TreeNode};
pub use kernel::KernelModel;
pub use knn::KnnModel;

use crate::{Error, FeatureStore, FeatureVector};
use std::fmt;
use std::str::FromStr;

/// Which similarity model answers a query. The wire tags (`knn`, `rf`,
/// `svm`) are a stable client contract and never change with the Rust
/// names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Knn,
    Forest,
    Kernel,
}

impl ModelKind {
    /// Stable tag used by the HTTP API.
    pub fn tag(self) -> &'static str {
        match self {
            ModelKind::Knn => "knn",
            ModelKind::Forest => "rf",
            ModelKind::Kernel => "svm",
        }
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "knn" => Ok(ModelKind::Knn),
            "rf" => Ok(ModelKind::Forest),
            "svm" => Ok(ModelKind::Kernel),
            other => Err(Error::UnknownModel(other.to_string())),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Ranking strategy over the feature space.
///
/// Implementations return row indices best-first, never include
/// `exclude`, and truncate to `limit`. A strategy may legitimately
/// return fewer than `limit` rows; any fallback policy belongs to the
/// caller. An empty store yields an empty result. Passing a reference
/// vector of the wrong dimensionality is a programming error.
pub trait SimilarityModel {
    fn rank(
        &self,
        store: &FeatureStore,
        reference: &FeatureVector,
        exclude: Option<usize>,
        limit: usize,
    ) -> Vec<usize>;
}
