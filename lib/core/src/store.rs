use crate::{Error, FeatureVector, Preferences, Result, SchoolRecord};

/// Read-only, row-aligned tables of school records and their
/// standardized feature vectors.
///
/// The row index is the sole join key between the two tables. Alignment
/// is validated at construction; a misaligned pair would otherwise
/// silently resolve queries to the wrong schools.
pub struct FeatureStore {
    records: Vec<SchoolRecord>,
    features: Vec<FeatureVector>,
}

impl FeatureStore {
    pub fn new(records: Vec<SchoolRecord>, features: Vec<FeatureVector>) -> Result<Self> {
        if records.len() != features.len() {
            return Err(Error::MisalignedArtifacts(format!(
                "{} records but {} feature rows",
                records.len(),
                features.len()
            )));
        }
        if let Some(first) = features.first() {
            let dim = first.dim();
            if let Some(bad) = features.iter().position(|v| v.dim() != dim) {
                return Err(Error::MisalignedArtifacts(format!(
                    "feature row {} has dimension {}, expected {}",
                    bad,
                    features[bad].dim(),
                    dim
                )));
            }
        }
        Ok(Self { records, features })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Feature-space dimensionality; 0 for an empty store.
    pub fn dim(&self) -> usize {
        self.features.first().map_or(0, FeatureVector::dim)
    }

    /// Case-insensitive exact name match.
    ///
    /// Multiple rows sharing a name are ambiguous; the first match
    /// (lowest row index) wins, deterministically.
    pub fn lookup_by_name(&self, name: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::SchoolNotFound(name.to_string()))
    }

    pub fn record(&self, index: usize) -> &SchoolRecord {
        &self.records[index]
    }

    pub fn feature_vector(&self, index: usize) -> &FeatureVector {
        &self.features[index]
    }

    pub fn records(&self) -> &[SchoolRecord] {
        &self.records
    }

    /// Row indices satisfying the given preferences, in original row order.
    pub fn filter(&self, prefs: &Preferences) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| prefs.matches(r))
            .map(|(i, _)| i)
            .collect()
    }

    /// Centroid of the given rows' feature vectors, used as a synthetic
    /// reference point for preference queries. `None` when `indices` is
    /// empty.
    pub fn mean_vector(&self, indices: &[usize]) -> Option<FeatureVector> {
        FeatureVector::mean_of(indices.iter().map(|&i| &self.features[i]))
    }

    /// School names in row order.
    pub fn school_names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.name.clone()).collect()
    }

    /// Sorted distinct city names.
    pub fn cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = self.records.iter().map(|r| r.city.clone()).collect();
        cities.sort();
        cities.dedup();
        cities
    }

    /// Sorted distinct zipcodes, rendered as strings for the API.
    pub fn zipcodes(&self) -> Vec<String> {
        let mut zips: Vec<u32> = self.records.iter().map(|r| r.zipcode).collect();
        zips.sort_unstable();
        zips.dedup();
        zips.into_iter().map(|z| z.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Location;

    fn store() -> FeatureStore {
        let records = vec![
            SchoolRecord::new("Alpha", "Tempe", 85281).with_grade(8.0),
            SchoolRecord::new("Beta", "Tempe", 85283).with_grade(6.0),
            SchoolRecord::new("Gamma", "Mesa", 85201).with_grade(9.0),
        ];
        let features = vec![
            FeatureVector::new(vec![0.0, 0.0]),
            FeatureVector::new(vec![1.0, 0.0]),
            FeatureVector::new(vec![0.0, 2.0]),
        ];
        FeatureStore::new(records, features).unwrap()
    }

    #[test]
    fn test_rejects_misaligned_tables() {
        let records = vec![SchoolRecord::new("Alpha", "Tempe", 85281)];
        let features = vec![
            FeatureVector::new(vec![0.0]),
            FeatureVector::new(vec![1.0]),
        ];
        assert!(matches!(
            FeatureStore::new(records, features),
            Err(Error::MisalignedArtifacts(_))
        ));
    }

    #[test]
    fn test_rejects_ragged_features() {
        let records = vec![
            SchoolRecord::new("Alpha", "Tempe", 85281),
            SchoolRecord::new("Beta", "Tempe", 85283),
        ];
        let features = vec![
            FeatureVector::new(vec![0.0, 1.0]),
            FeatureVector::new(vec![1.0]),
        ];
        assert!(matches!(
            FeatureStore::new(records, features),
            Err(Error::MisalignedArtifacts(_))
        ));
    }

    #[test]
    fn test_record_and_features_stay_aligned() {
        let store = store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.dim(), 2);
        assert_eq!(store.record(1).name, "Beta");
        assert_eq!(store.feature_vector(1).as_slice(), &[1.0, 0.0]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let store = store();
        assert_eq!(store.lookup_by_name("alpha").unwrap(), 0);
        assert_eq!(store.lookup_by_name("GAMMA").unwrap(), 2);
        assert!(matches!(
            store.lookup_by_name("Delta"),
            Err(Error::SchoolNotFound(_))
        ));
    }

    #[test]
    fn test_ambiguous_name_picks_first_row() {
        let records = vec![
            SchoolRecord::new("Twin", "Tempe", 85281),
            SchoolRecord::new("Twin", "Mesa", 85201),
        ];
        let features = vec![
            FeatureVector::new(vec![0.0]),
            FeatureVector::new(vec![1.0]),
        ];
        let store = FeatureStore::new(records, features).unwrap();
        assert_eq!(store.lookup_by_name("twin").unwrap(), 0);
    }

    #[test]
    fn test_filter_preserves_row_order() {
        let store = store();
        let prefs = Preferences {
            location: Some(Location::City("Tempe".to_string())),
            ..Default::default()
        };
        assert_eq!(store.filter(&prefs), vec![0, 1]);
    }

    #[test]
    fn test_mean_vector() {
        let store = store();
        let mean = store.mean_vector(&[0, 1]).unwrap();
        assert_eq!(mean.as_slice(), &[0.5, 0.0]);
        assert!(store.mean_vector(&[]).is_none());
    }

    #[test]
    fn test_listings() {
        let store = store();
        assert_eq!(store.school_names(), vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(store.cities(), vec!["Mesa", "Tempe"]);
        assert_eq!(store.zipcodes(), vec!["85201", "85281", "85283"]);
    }
}
