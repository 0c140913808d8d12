use sprs::CsVec;

/// Sparse TF-IDF encoding of one document.
///
/// The dimension equals the vocabulary size of the vectorizer that produced
/// it and is the same for every document that vectorizer encodes.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector(CsVec<f64>);

impl FeatureVector {
    /// `indices` must be strictly increasing and below `dim`.
    pub(crate) fn new(dim: usize, indices: Vec<usize>, data: Vec<f64>) -> Self {
        Self(CsVec::new(dim, indices, data))
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.0.dim()
    }

    /// Number of stored (in-vocabulary) entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.0.nnz()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    #[must_use]
    pub fn as_sparse(&self) -> &CsVec<f64> {
        &self.0
    }

    /// Dense `f32` copy, the layout model runtimes expect.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_dense_f32(&self) -> Vec<f32> {
        let mut dense = vec![0.0f32; self.dim()];
        for (idx, &val) in self.0.iter() {
            dense[idx] = val as f32;
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_layout() {
        let vector = FeatureVector::new(5, vec![1, 3], vec![0.6, 0.8]);
        assert_eq!(vector.dim(), 5);
        assert_eq!(vector.nnz(), 2);
        assert_eq!(vector.to_dense_f32(), vec![0.0, 0.6, 0.0, 0.8, 0.0]);
        assert_eq!(vector.get(3), Some(0.8));
        assert_eq!(vector.get(0), None);
    }

    #[test]
    fn test_empty_vector_keeps_dimension() {
        let vector = FeatureVector::new(4, Vec::new(), Vec::new());
        assert_eq!(vector.dim(), 4);
        assert_eq!(vector.nnz(), 0);
        assert_eq!(vector.to_dense_f32(), vec![0.0; 4]);
    }
}
