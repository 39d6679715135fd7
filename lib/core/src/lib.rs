//! # schoolrec-core
//!
//! Core library for the schoolrec recommender.
//!
//! This crate provides the serving-time data structures and the
//! recommendation-resolution logic:
//!
//! - [`SchoolRecord`] - one school's raw attributes
//! - [`FeatureVector`] - the standardized numeric projection of a record
//! - [`FeatureStore`] - the aligned, read-only record/feature tables
//! - [`SimilarityModel`] - the common contract of the three strategies
//!   ([`KnnModel`], [`ForestModel`], [`KernelModel`])
//! - [`Resolver`] - query orchestration: lookup, ranking, filtering,
//!   deduplication, truncation and fallback
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use schoolrec_core::{
//!     FeatureStore, FeatureVector, ForestModel, KernelModel, ModelKind,
//!     Resolver, SchoolRecord,
//! };
//!
//! let records = vec![
//!     SchoolRecord::new("Alpha", "Tempe", 85281).with_grade(8.0),
//!     SchoolRecord::new("Beta", "Tempe", 85283).with_grade(7.0),
//! ];
//! let features = vec![
//!     FeatureVector::new(vec![0.0, 1.0]),
//!     FeatureVector::new(vec![0.5, 0.5]),
//! ];
//! let store = Arc::new(FeatureStore::new(records, features).unwrap());
//! let resolver = Resolver::new(store, ForestModel::new(Vec::new()), KernelModel::new(0.5));
//!
//! let similar = resolver.by_name("alpha", ModelKind::Knn).unwrap();
//! assert_eq!(similar.schools[0].name, "Beta");
//! ```

pub mod error;
pub mod filter;
pub mod model;
pub mod record;
pub mod resolver;
pub mod store;
pub mod vector;

pub use error::{Error, Result};
pub use filter::{Location, Preferences};
pub use model::{
    DecisionTree, ForestModel, KernelModel, KnnModel, ModelKind, SimilarityModel, TreeNode,
};
pub use record::SchoolRecord;
pub use resolver::{Recommendation, Resolver, DEFAULT_CANDIDATE_POOL, RESULT_LIMIT};
pub use store::FeatureStore;
pub use vector::FeatureVector;
