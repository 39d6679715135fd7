//! The offline training pipeline.
//!
//! Encodes the raw dataset into a standardized feature table, fits the
//! ensemble committee and the kernel parameters, and packages everything
//! as an [`Artifacts`] snapshot. Everything here is deterministic for a
//! fixed seed.

use crate::{Artifacts, Dataset};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schoolrec_core::{DecisionTree, Error, FeatureVector, ForestModel, KernelModel, Result, TreeNode};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Committee size of the ensemble model.
    pub n_trees: usize,
    /// Depth cap for each committee tree.
    pub max_depth: usize,
    /// Seed for bootstrap sampling.
    pub seed: u64,
    /// Dataset columns excluded from the feature space, by name.
    pub drop_columns: Vec<String>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            n_trees: 5,
            max_depth: 15,
            seed: 42,
            drop_columns: Vec::new(),
        }
    }
}

/// Fit all three similarity structures from the dataset.
///
/// The nearest-neighbor model needs no fitted state beyond the
/// standardized feature table itself, which is part of the returned
/// artifacts.
pub fn train(dataset: &Dataset, config: &TrainConfig) -> Result<Artifacts> {
    if dataset.records.is_empty() {
        return Err(Error::Dataset("dataset has no rows".to_string()));
    }

    let mut columns = assemble_columns(dataset);
    columns.retain(|(name, _)| !config.drop_columns.contains(name));
    if columns.is_empty() {
        return Err(Error::Dataset("no feature columns left after drops".to_string()));
    }
    for column in &mut columns {
        standardize(&mut column.1);
    }

    let n_rows = dataset.records.len();
    let n_features = columns.len();
    let features: Vec<FeatureVector> = (0..n_rows)
        .map(|row| FeatureVector::new(columns.iter().map(|(_, values)| values[row]).collect()))
        .collect();
    info!(
        "encoded {} schools into {} standardized features",
        n_rows, n_features
    );

    let mut trees = Vec::with_capacity(config.n_trees);
    for t in 0..config.n_trees {
        let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(t as u64));
        let sample: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();
        trees.push(DecisionTree::new(build_tree(
            &features,
            &sample,
            0,
            config.max_depth,
        )));
    }
    info!("fitted ensemble committee of {} trees", trees.len());

    // 'scale' gamma on unit-variance columns
    let kernel = KernelModel::new(1.0 / n_features as f32);

    Ok(Artifacts {
        records: dataset.records.clone(),
        feature_columns: columns.into_iter().map(|(name, _)| name).collect(),
        features,
        forest: ForestModel::new(trees),
        kernel,
    })
}

/// Named numeric columns in a stable order: encoded identity columns,
/// level flags, grade, then the extra columns in dataset order. The
/// school name is identity, never a feature.
fn assemble_columns(dataset: &Dataset) -> Vec<(String, Vec<f32>)> {
    let records = &dataset.records;
    let flag = |set: bool| if set { 1.0 } else { 0.0 };
    let mut columns = vec![
        (
            "city".to_string(),
            label_encode(records.iter().map(|r| r.city.as_str())),
        ),
        (
            "zipcode".to_string(),
            label_encode(records.iter().map(|r| r.zipcode)),
        ),
        (
            "elementary_school".to_string(),
            records.iter().map(|r| flag(r.elementary)).collect(),
        ),
        (
            "intermediate_school".to_string(),
            records.iter().map(|r| flag(r.intermediate)).collect(),
        ),
        (
            "middle_school".to_string(),
            records.iter().map(|r| flag(r.middle)).collect(),
        ),
        (
            "high_school".to_string(),
            records.iter().map(|r| flag(r.high)).collect(),
        ),
        (
            "school_grade".to_string(),
            records.iter().map(|r| r.school_grade).collect(),
        ),
    ];
    for extra in &dataset.extra_columns {
        columns.push((
            extra.clone(),
            records
                .iter()
                .map(|r| r.extra.get(extra).copied().unwrap_or(0.0))
                .collect(),
        ));
    }
    columns
}

/// Sorted-distinct label encoding: each distinct value maps to its rank.
fn label_encode<T: Ord + Clone>(values: impl Iterator<Item = T> + Clone) -> Vec<f32> {
    let classes: BTreeMap<T, usize> = values
        .clone()
        .collect::<std::collections::BTreeSet<T>>()
        .into_iter()
        .enumerate()
        .map(|(code, value)| (value, code))
        .collect();
    values.map(|v| classes[&v] as f32).collect()
}

/// In-place standardization with population statistics. Zero-variance
/// columns are mean-centered only.
fn standardize(values: &mut [f32]) {
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;
    let std = variance.sqrt();
    for v in values.iter_mut() {
        *v -= mean;
        if std > f32::EPSILON {
            *v /= std;
        }
    }
}

/// CART on a bootstrap sample. `rows` are original row indices; each row
/// is its own class, so leaves predict the majority row directly.
fn build_tree(
    features: &[FeatureVector],
    rows: &[usize],
    depth: usize,
    max_depth: usize,
) -> TreeNode {
    let pure = rows.windows(2).all(|w| w[0] == w[1]);
    if pure || depth >= max_depth {
        return TreeNode::Leaf {
            row: majority_row(rows),
        };
    }
    let Some((feature, threshold)) = find_best_split(features, rows) else {
        return TreeNode::Leaf {
            row: majority_row(rows),
        };
    };

    let (left, right): (Vec<usize>, Vec<usize>) = rows
        .iter()
        .copied()
        .partition(|&r| features[r].as_slice()[feature] <= threshold);
    TreeNode::Split {
        feature,
        threshold,
        left: Box::new(build_tree(features, &left, depth + 1, max_depth)),
        right: Box::new(build_tree(features, &right, depth + 1, max_depth)),
    }
}

/// Best (feature, threshold) by weighted Gini impurity; candidate
/// thresholds are midpoints between consecutive distinct values. Ties
/// keep the first candidate found, so fitting is deterministic.
fn find_best_split(features: &[FeatureVector], rows: &[usize]) -> Option<(usize, f32)> {
    let dim = features.first().map_or(0, FeatureVector::dim);
    let mut best: Option<(f32, usize, f32)> = None;
    for feature in 0..dim {
        let mut values: Vec<f32> = rows
            .iter()
            .map(|&r| features[r].as_slice()[feature])
            .collect();
        values.sort_by(f32::total_cmp);
        values.dedup();
        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;
            let (left, right): (Vec<usize>, Vec<usize>) = rows
                .iter()
                .copied()
                .partition(|&r| features[r].as_slice()[feature] <= threshold);
            if left.is_empty() || right.is_empty() {
                continue;
            }
            let gini = gini_split(&left, &right);
            if best.map_or(true, |(g, _, _)| gini < g) {
                best = Some((gini, feature, threshold));
            }
        }
    }
    best.map(|(_, feature, threshold)| (feature, threshold))
}

/// Gini impurity over row-index labels: 1 - sum(p_i^2).
fn gini_impurity(labels: &[usize]) -> f32 {
    if labels.is_empty() {
        return 0.0;
    }
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let n = labels.len() as f32;
    let mut gini = 1.0;
    for count in counts.values() {
        let p = *count as f32 / n;
        gini -= p * p;
    }
    gini
}

fn gini_split(left: &[usize], right: &[usize]) -> f32 {
    let n_left = left.len() as f32;
    let n_right = right.len() as f32;
    let n_total = n_left + n_right;
    if n_total == 0.0 {
        return 0.0;
    }
    (n_left / n_total) * gini_impurity(left) + (n_right / n_total) * gini_impurity(right)
}

/// Most frequent row; ties go to the lowest row index.
fn majority_row(rows: &[usize]) -> usize {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for &row in rows {
        *counts.entry(row).or_insert(0) += 1;
    }
    let mut best_row = 0;
    let mut best_count = 0;
    for (row, count) in counts {
        if count > best_count {
            best_row = row;
            best_count = count;
        }
    }
    best_row
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolrec_core::{ModelKind, SchoolRecord};

    fn dataset() -> Dataset {
        let records = vec![
            SchoolRecord::new("Alpha", "Tempe", 85281)
                .with_levels(true, false, false, false)
                .with_grade(8.0)
                .with_extra("students", 500.0),
            SchoolRecord::new("Beta", "Tempe", 85283)
                .with_levels(true, false, false, false)
                .with_grade(6.0)
                .with_extra("students", 520.0),
            SchoolRecord::new("Gamma", "Mesa", 85201)
                .with_levels(false, false, false, true)
                .with_grade(9.0)
                .with_extra("students", 1400.0),
            SchoolRecord::new("Delta", "Mesa", 85204)
                .with_levels(false, false, false, true)
                .with_grade(7.0)
                .with_extra("students", 1350.0),
        ];
        Dataset {
            records,
            extra_columns: vec!["students".to_string()],
        }
    }

    #[test]
    fn test_label_encode_sorts_distinct_values() {
        let encoded = label_encode(["b", "a", "c", "a"].into_iter());
        assert_eq!(encoded, vec![1.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_standardize_centers_and_scales() {
        let mut values = vec![2.0, 4.0, 6.0, 8.0];
        standardize(&mut values);
        let mean: f32 = values.iter().sum::<f32>() / 4.0;
        let variance: f32 = values.iter().map(|v| v * v).sum::<f32>() / 4.0;
        assert!(mean.abs() < 1e-6);
        assert!((variance - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_standardize_constant_column() {
        let mut values = vec![3.0, 3.0, 3.0];
        standardize(&mut values);
        assert_eq!(values, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_majority_row_tie_goes_to_lowest() {
        assert_eq!(majority_row(&[2, 1, 2, 1]), 1);
        assert_eq!(majority_row(&[3, 3, 1]), 3);
    }

    #[test]
    fn test_train_produces_aligned_artifacts() {
        let dataset = dataset();
        let artifacts = train(&dataset, &TrainConfig::default()).unwrap();
        assert_eq!(artifacts.records.len(), artifacts.features.len());
        assert_eq!(artifacts.feature_columns.len(), artifacts.features[0].dim());
        assert_eq!(artifacts.forest.len(), 5);
        // city, zipcode, four level flags, grade, students
        assert_eq!(artifacts.feature_columns.len(), 8);
    }

    #[test]
    fn test_training_is_deterministic() {
        let dataset = dataset();
        let config = TrainConfig::default();
        let a = train(&dataset, &config).unwrap();
        let b = train(&dataset, &config).unwrap();
        assert_eq!(a.features, b.features);
        assert_eq!(a.forest, b.forest);
        assert_eq!(a.kernel, b.kernel);
    }

    #[test]
    fn test_drop_columns_shrink_the_feature_space() {
        let dataset = dataset();
        let config = TrainConfig {
            drop_columns: vec!["students".to_string(), "zipcode".to_string()],
            ..Default::default()
        };
        let artifacts = train(&dataset, &config).unwrap();
        assert_eq!(artifacts.feature_columns.len(), 6);
        assert!(!artifacts.feature_columns.contains(&"students".to_string()));
    }

    #[test]
    fn test_trained_models_resolve_similar_schools() {
        let dataset = dataset();
        let resolver = train(&dataset, &TrainConfig::default())
            .unwrap()
            .into_resolver()
            .unwrap();
        // Beta is the other Tempe elementary school, nearest to Alpha.
        let rec = resolver.by_name("Alpha", ModelKind::Knn).unwrap();
        assert_eq!(rec.schools[0].name, "Beta");
    }
}
