use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One school's raw attributes as loaded from the training dataset.
///
/// Records are immutable after training. They are identified by their
/// stable row index in the [`FeatureStore`](crate::FeatureStore); field
/// names on the wire match the dataset headers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchoolRecord {
    #[serde(rename = "School_name")]
    pub name: String,
    pub city: String,
    pub zipcode: u32,
    #[serde(rename = "elementary_school")]
    pub elementary: bool,
    #[serde(rename = "intermediate_school")]
    pub intermediate: bool,
    #[serde(rename = "middle_school")]
    pub middle: bool,
    #[serde(rename = "high_school")]
    pub high: bool,
    pub school_grade: f32,
    /// Remaining numeric descriptive columns, keyed by dataset header.
    pub extra: BTreeMap<String, f32>,
}

impl SchoolRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, city: impl Into<String>, zipcode: u32) -> Self {
        Self {
            name: name.into(),
            city: city.into(),
            zipcode,
            elementary: false,
            intermediate: false,
            middle: false,
            high: false,
            school_grade: 0.0,
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_levels(
        mut self,
        elementary: bool,
        intermediate: bool,
        middle: bool,
        high: bool,
    ) -> Self {
        self.elementary = elementary;
        self.intermediate = intermediate;
        self.middle = middle;
        self.high = high;
        self
    }

    #[must_use]
    pub fn with_grade(mut self, grade: f32) -> Self {
        self.school_grade = grade;
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: f32) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
