use schoolrec_core::{Error, Result, SchoolRecord};
use std::path::Path;

const NAME: &str = "School_name";
const CITY: &str = "city";
const ZIPCODE: &str = "zipcode";
const ELEMENTARY: &str = "elementary_school";
const INTERMEDIATE: &str = "intermediate_school";
const MIDDLE: &str = "middle_school";
const HIGH: &str = "high_school";
const SCHOOL_GRADE: &str = "school_grade";

const REQUIRED: [&str; 8] = [
    NAME,
    CITY,
    ZIPCODE,
    ELEMENTARY,
    INTERMEDIATE,
    MIDDLE,
    HIGH,
    SCHOOL_GRADE,
];

/// The raw training dataset: one record per CSV row, plus the extra
/// numeric column names in dataset order (the record's `extra` map is
/// sorted by key and loses that order).
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<SchoolRecord>,
    pub extra_columns: Vec<String>,
}

/// Load the school dataset from a CSV file.
///
/// The eight identity/flag/grade columns are required by name; every
/// other column must be numeric and becomes an extra feature.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| Error::Dataset(format!("{}: {e}", path.display())))?;

    let headers = reader
        .headers()
        .map_err(|e| Error::Dataset(e.to_string()))?
        .clone();
    let find = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::Dataset(format!("missing required column {name}")))
    };
    let name_at = find(NAME)?;
    let city_at = find(CITY)?;
    let zipcode_at = find(ZIPCODE)?;
    let elementary_at = find(ELEMENTARY)?;
    let intermediate_at = find(INTERMEDIATE)?;
    let middle_at = find(MIDDLE)?;
    let high_at = find(HIGH)?;
    let grade_at = find(SCHOOL_GRADE)?;
    let extras: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !REQUIRED.contains(h))
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let line = result.map_err(|e| Error::Dataset(format!("row {row}: {e}")))?;
        let cell = |at: usize, name: &str| -> Result<f32> {
            let raw = line.get(at).unwrap_or_default().trim();
            raw.parse::<f32>().map_err(|_| {
                Error::Dataset(format!(
                    "row {row}, column {name}: expected a number, got {raw:?}"
                ))
            })
        };

        let mut record = SchoolRecord::new(
            line.get(name_at).unwrap_or_default(),
            line.get(city_at).unwrap_or_default(),
            cell(zipcode_at, ZIPCODE)? as u32,
        )
        .with_levels(
            cell(elementary_at, ELEMENTARY)? != 0.0,
            cell(intermediate_at, INTERMEDIATE)? != 0.0,
            cell(middle_at, MIDDLE)? != 0.0,
            cell(high_at, HIGH)? != 0.0,
        )
        .with_grade(cell(grade_at, SCHOOL_GRADE)?);
        for (at, extra) in &extras {
            record = record.with_extra(extra.clone(), cell(*at, extra)?);
        }
        records.push(record);
    }

    Ok(Dataset {
        records,
        extra_columns: extras.into_iter().map(|(_, name)| name).collect(),
    })
}
