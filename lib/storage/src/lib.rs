//! Storage layer for the schoolrec recommender: dataset ingestion, the
//! offline training pipeline, and the artifact snapshot consumed at
//! service start.

pub mod artifacts;
pub mod dataset;
pub mod train;

pub use artifacts::Artifacts;
pub use dataset::{load_dataset, Dataset};
pub use train::{train, TrainConfig};
