use serde::{Deserialize, Serialize};

/// The standardized numeric projection of one school row.
///
/// Feature vectors live in a table aligned row-for-row with the raw
/// record table; the shared row index is the only join key between them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    data: Vec<f32>,
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Compute L2 (Euclidean) distance.
    ///
    /// Dimensionality mismatch is a programming error, not a query error.
    #[inline]
    pub fn l2_distance(&self, other: &FeatureVector) -> f32 {
        assert_eq!(self.dim(), other.dim(), "feature dimensionality mismatch");
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>()
            .sqrt()
    }

    /// Component-wise arithmetic mean of the given vectors.
    ///
    /// Returns `None` for an empty input.
    pub fn mean_of<'a, I>(vectors: I) -> Option<FeatureVector>
    where
        I: IntoIterator<Item = &'a FeatureVector>,
    {
        let mut iter = vectors.into_iter();
        let first = iter.next()?;
        let mut acc: Vec<f32> = first.data.clone();
        let mut count = 1usize;
        for v in iter {
            assert_eq!(v.dim(), acc.len(), "feature dimensionality mismatch");
            for (a, x) in acc.iter_mut().zip(v.data.iter()) {
                *a += x;
            }
            count += 1;
        }
        let n = count as f32;
        for a in &mut acc {
            *a /= n;
        }
        Some(FeatureVector::new(acc))
    }
}
