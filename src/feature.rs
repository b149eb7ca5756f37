//! Feature extraction for flight codes.
//!
//! Two interchangeable pipelines turn a code into a [`FeatureVector`]:
//!
//! - [`whole_string::WholeStringFeaturizer`] - word unigrams plus marked
//!   character trigrams over the normalized code, L2-normalized counts
//! - [`char_trigram::CharTrigramFeaturizer`] - a bag of character trigrams
//!   weighted by TF-IDF
//!
//! Both implement [`pipeline::FeaturePipeline`] and are selected through
//! [`pipeline::PipelineKind`]. Labels are encoded separately by
//! [`label::LabelEncoder`].

pub mod char_trigram;
pub mod label;
pub mod pipeline;
pub mod tfidf;
pub mod whole_string;

pub use label::{LabelEncoder, LabelKey};
pub use pipeline::{FeatureConfig, FeaturePipeline, FittedPipeline, PipelineKind};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A sparse numeric feature vector.
///
/// Indices are strictly increasing, so iteration order (and therefore every
/// floating point sum over the vector) is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    dimension: usize,
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl FeatureVector {
    /// An all-zero vector of the given dimension.
    pub fn zeros(dimension: usize) -> Self {
        FeatureVector {
            dimension,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build a vector from `(index, value)` entries. Zero values are dropped.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range.
    pub fn from_entries(dimension: usize, entries: BTreeMap<usize, f32>) -> Self {
        let mut indices = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        for (index, value) in entries {
            assert!(index < dimension, "feature index {index} out of range {dimension}");
            if value != 0.0 {
                indices.push(index as u32);
                values.push(value);
            }
        }
        FeatureVector {
            dimension,
            indices,
            values,
        }
    }

    /// The logical length of the vector.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Iterate over `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices
            .iter()
            .zip(self.values.iter())
            .map(|(&i, &v)| (i as usize, v))
    }

    /// Value at `index` (zero when not stored).
    pub fn get(&self, index: usize) -> f32 {
        match self.indices.binary_search(&(index as u32)) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Dot product with a dense weight row.
    pub fn dot(&self, weights: &[f32]) -> f32 {
        self.iter().map(|(i, v)| weights[i] * v).sum()
    }

    /// Euclidean norm.
    pub fn l2_norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Scale to unit Euclidean norm. The zero vector is left unchanged.
    pub fn l2_normalize(&mut self) {
        let norm = self.l2_norm();
        if norm > 0.0 {
            for value in &mut self.values {
                *value /= norm;
            }
        }
    }

    /// Append `other` after this vector, offsetting its indices.
    pub fn concat(mut self, other: &FeatureVector) -> FeatureVector {
        let offset = self.dimension as u32;
        self.indices.extend(other.indices.iter().map(|i| i + offset));
        self.values.extend_from_slice(&other.values);
        self.dimension += other.dimension;
        self
    }

    /// Expand into a dense vector.
    pub fn to_dense(&self) -> Vec<f32> {
        let mut dense = vec![0.0; self.dimension];
        for (i, v) in self.iter() {
            dense[i] = v;
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(dimension: usize, entries: &[(usize, f32)]) -> FeatureVector {
        FeatureVector::from_entries(dimension, entries.iter().copied().collect())
    }

    #[test]
    fn test_from_entries_drops_zeros() {
        let v = vector(5, &[(4, 2.0), (1, 0.0), (0, 1.0)]);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(0, 1.0), (4, 2.0)]);
        assert_eq!(v.get(4), 2.0);
        assert_eq!(v.get(1), 0.0);
    }

    #[test]
    fn test_dot_and_norm() {
        let v = vector(3, &[(0, 3.0), (2, 4.0)]);
        assert_eq!(v.dot(&[1.0, 10.0, 0.5]), 5.0);
        assert_eq!(v.l2_norm(), 5.0);

        let mut unit = v.clone();
        unit.l2_normalize();
        assert!((unit.l2_norm() - 1.0).abs() < 1e-6);
        assert_eq!(unit.to_dense(), vec![0.6, 0.0, 0.8]);
    }

    #[test]
    fn test_zero_vector_normalize() {
        let mut v = FeatureVector::zeros(4);
        v.l2_normalize();
        assert_eq!(v.nnz(), 0);
        assert_eq!(v.dimension(), 4);
    }

    #[test]
    fn test_concat_offsets_indices() {
        let left = vector(2, &[(1, 1.0)]);
        let right = vector(3, &[(0, 2.0), (2, 3.0)]);
        let joined = left.concat(&right);

        assert_eq!(joined.dimension(), 5);
        assert_eq!(joined.to_dense(), vec![0.0, 1.0, 2.0, 0.0, 3.0]);
    }
}
