//! # schoolrec
//!
//! A school similarity recommender with three interchangeable models.
//!
//! schoolrec answers two kinds of query over a trained feature space:
//! "schools similar to X" and "schools matching these preferences",
//! using exact nearest-neighbor lookup, ensemble-tree voting, or
//! probabilistic kernel ranking.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! schoolrec train --dataset data/schools.csv
//! schoolrec serve --port 5000
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use schoolrec::prelude::*;
//!
//! // Train offline...
//! let dataset = load_dataset("data/schools.csv").unwrap();
//! let artifacts = train(&dataset, &TrainConfig::default()).unwrap();
//! artifacts.save("models/schoolrec.bin").unwrap();
//!
//! // ...then resolve queries at serving time.
//! let resolver = Artifacts::load("models/schoolrec.bin")
//!     .unwrap()
//!     .into_resolver()
//!     .unwrap();
//! let similar = resolver.by_name("Desert Vista", ModelKind::Knn).unwrap();
//! ```
//!
//! ## Crate Structure
//!
//! - `schoolrec-core` - feature store, similarity models, resolver
//! - `schoolrec-storage` - dataset ingestion, training, artifact snapshots
//! - `schoolrec-api` - REST API

// Re-export core types
pub use schoolrec_core::{
    DecisionTree, Error, FeatureStore, FeatureVector, ForestModel, KernelModel, KnnModel,
    Location, ModelKind, Preferences, Recommendation, Resolver, Result, SchoolRecord,
    SimilarityModel, TreeNode, RESULT_LIMIT,
};

// Re-export storage
pub use schoolrec_storage::{load_dataset, train, Artifacts, Dataset, TrainConfig};

// Re-export API
pub use schoolrec_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        load_dataset, train, Artifacts, Dataset, Error, FeatureStore, FeatureVector, ForestModel,
        KernelModel, KnnModel, Location, ModelKind, Preferences, Recommendation, Resolver, Result,
        RestApi, SchoolRecord, SimilarityModel, TrainConfig, RESULT_LIMIT,
    };
}
