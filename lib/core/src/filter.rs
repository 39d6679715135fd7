// Typed preference constraints applied by the feature store.
use crate::SchoolRecord;

/// Location constraint. City and zipcode are mutually exclusive; a query
/// carries at most one of the two.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    City(String),
    Zip(u32),
}

/// The constraint side of a preference query.
///
/// An absent field means "no constraint" for that dimension. Level flags
/// only ever narrow: a `false` flag does not require the level's absence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    pub location: Option<Location>,
    pub elementary: bool,
    pub intermediate: bool,
    pub middle: bool,
    pub high: bool,
    pub min_grade: Option<f32>,
}

impl Preferences {
    pub fn matches(&self, record: &SchoolRecord) -> bool {
        match &self.location {
            Some(Location::City(city)) if record.city != *city => return false,
            Some(Location::Zip(zip)) if record.zipcode != *zip => return false,
            _ => {}
        }
        if self.elementary && !record.elementary {
            return false;
        }
        if self.intermediate && !record.intermediate {
            return false;
        }
        if self.middle && !record.middle {
            return false;
        }
        if self.high && !record.high {
            return false;
        }
        if let Some(min) = self.min_grade {
            if record.school_grade < min {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SchoolRecord {
        SchoolRecord::new("Desert Vista", "Tempe", 85283)
            .with_levels(true, false, false, true)
            .with_grade(8.0)
    }

    #[test]
    fn test_empty_preferences_match_everything() {
        assert!(Preferences::default().matches(&record()));
    }

    #[test]
    fn test_city_filter() {
        let prefs = Preferences {
            location: Some(Location::City("Tempe".to_string())),
            ..Default::default()
        };
        assert!(prefs.matches(&record()));

        let prefs = Preferences {
            location: Some(Location::City("Mesa".to_string())),
            ..Default::default()
        };
        assert!(!prefs.matches(&record()));
    }

    #[test]
    fn test_zip_filter() {
        let prefs = Preferences {
            location: Some(Location::Zip(85283)),
            ..Default::default()
        };
        assert!(prefs.matches(&record()));

        let prefs = Preferences {
            location: Some(Location::Zip(85001)),
            ..Default::default()
        };
        assert!(!prefs.matches(&record()));
    }

    #[test]
    fn test_level_flags_narrow_only() {
        let prefs = Preferences {
            elementary: true,
            ..Default::default()
        };
        assert!(prefs.matches(&record()));

        let prefs = Preferences {
            middle: true,
            ..Default::default()
        };
        assert!(!prefs.matches(&record()));
    }

    #[test]
    fn test_min_grade() {
        let prefs = Preferences {
            min_grade: Some(8.0),
            ..Default::default()
        };
        assert!(prefs.matches(&record()));

        let prefs = Preferences {
            min_grade: Some(9.0),
            ..Default::default()
        };
        assert!(!prefs.matches(&record()));
    }
}
