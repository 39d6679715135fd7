use schoolrec_core::{
    Error, FeatureStore, FeatureVector, ForestModel, KernelModel, Resolver, Result, SchoolRecord,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// The persisted artifact set: everything the serving phase needs, keyed
/// by one shared row-index space.
///
/// Persistence is a single bincode snapshot. Loading is all-or-nothing:
/// either every table deserializes and re-validates, or the caller gets
/// an error and must not serve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifacts {
    pub records: Vec<SchoolRecord>,
    /// Standardized feature column names, in feature order.
    pub feature_columns: Vec<String>,
    pub features: Vec<FeatureVector>,
    pub forest: ForestModel,
    pub kernel: KernelModel,
}

impl Artifacts {
    /// Write the snapshot. The write goes to a temp file first and is
    /// renamed into place, so a crash never leaves a half-written
    /// artifact at `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let data = bincode::serialize(self).map_err(|e| Error::Serialization(e.to_string()))?;
        let temp = path.with_extension("tmp");
        std::fs::write(&temp, &data)?;
        std::fs::rename(&temp, path)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        bincode::deserialize(&data).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Validate alignment and build the serving resolver.
    pub fn into_resolver(self) -> Result<Resolver> {
        if let Some(first) = self.features.first() {
            if first.dim() != self.feature_columns.len() {
                return Err(Error::MisalignedArtifacts(format!(
                    "{} feature columns but vectors of dimension {}",
                    self.feature_columns.len(),
                    first.dim()
                )));
            }
        }
        let store = FeatureStore::new(self.records, self.features)?;
        Ok(Resolver::new(Arc::new(store), self.forest, self.kernel))
    }
}
