//! Affinity matrices consumed by symmetric NMF.
//!
//! The factorization itself lives outside this crate; these are the inputs it
//! expects, built from the same data points the k-means engine clusters.

use crate::distance::squared_euclidean;
use crate::error::KMeansError;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;

/// Gaussian similarity matrix: `exp(-||x_i - x_j||^2 / 2)` off the diagonal, 0 on it
pub fn similarity_matrix(data: &ArrayView2<f64>) -> Array2<f64> {
    let n = data.nrows();
    let mut similarity = Array2::zeros((n, n));

    // Parallel computation of rows
    similarity
        .as_slice_mut()
        .expect("freshly allocated array is contiguous")
        .par_chunks_mut(n.max(1))
        .enumerate()
        .for_each(|(i, row)| {
            let x_i = data.row(i);
            for (j, value) in row.iter_mut().enumerate() {
                if i != j {
                    *value = (-0.5 * squared_euclidean(&x_i, &data.row(j))).exp();
                }
            }
        });

    similarity
}

/// Degree of every node: the row sums of the similarity matrix
pub fn degree_vector(similarity: &ArrayView2<f64>) -> Array1<f64> {
    similarity.sum_axis(Axis(1))
}

/// Diagonal degree matrix
pub fn degree_matrix(similarity: &ArrayView2<f64>) -> Array2<f64> {
    Array2::from_diag(&degree_vector(similarity))
}

/// Normalized similarity `D^-1/2 A D^-1/2`.
///
/// # Errors
///
/// Returns [`KMeansError::InvalidInput`] if a node has zero (or non-finite)
/// degree, and [`KMeansError::InvalidDimensions`] if the shapes disagree.
pub fn normalized_similarity(
    similarity: &ArrayView2<f64>,
    degrees: &ArrayView1<f64>,
) -> Result<Array2<f64>, KMeansError> {
    let n = similarity.nrows();
    if similarity.ncols() != n || degrees.len() != n {
        return Err(KMeansError::InvalidDimensions(format!(
            "similarity is {}x{}, degrees has {} entries",
            n,
            similarity.ncols(),
            degrees.len()
        )));
    }

    if let Some(i) = degrees.iter().position(|&d| !(d.is_finite() && d > 0.0)) {
        return Err(KMeansError::InvalidInput(format!(
            "point {} has degree {}",
            i, degrees[i]
        )));
    }

    let inv_sqrt = degrees.mapv(|d| 1.0 / d.sqrt());
    Ok(Array2::from_shape_fn((n, n), |(i, j)| {
        similarity[[i, j]] * inv_sqrt[i] * inv_sqrt[j]
    }))
}

/// Similarity, degrees and normalization in one go
pub fn normalized_similarity_from_data(data: &ArrayView2<f64>) -> Result<Array2<f64>, KMeansError> {
    let similarity = similarity_matrix(data);
    let degrees = degree_vector(&similarity.view());
    normalized_similarity(&similarity.view(), &degrees.view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_similarity_matrix() {
        let data = array![[0.0, 0.0], [1.0, 1.0], [0.0, 2.0]];
        let sim = similarity_matrix(&data.view());

        assert_eq!(sim.dim(), (3, 3));
        for i in 0..3 {
            assert_eq!(sim[[i, i]], 0.0);
            for j in 0..3 {
                assert_relative_eq!(sim[[i, j]], sim[[j, i]], epsilon = 1e-15);
            }
        }
        assert_relative_eq!(sim[[0, 1]], (-1.0f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(sim[[0, 2]], (-2.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_degree_matrix() {
        let sim = array![[0.0, 0.5, 0.25], [0.5, 0.0, 1.0], [0.25, 1.0, 0.0]];

        let degrees = degree_vector(&sim.view());
        assert_eq!(degrees, array![0.75, 1.5, 1.25]);

        let ddg = degree_matrix(&sim.view());
        assert_eq!(ddg[[1, 1]], 1.5);
        assert_eq!(ddg[[0, 1]], 0.0);
    }

    #[test]
    fn test_normalized_similarity() {
        let sim = array![[0.0, 0.5], [0.5, 0.0]];
        let degrees = degree_vector(&sim.view());

        let norm = normalized_similarity(&sim.view(), &degrees.view()).unwrap();
        // Both degrees are 0.5, so the off-diagonal becomes 0.5 / 0.5
        assert_relative_eq!(norm[[0, 1]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(norm[[1, 0]], 1.0, epsilon = 1e-12);
        assert_eq!(norm[[0, 0]], 0.0);
    }

    #[test]
    fn test_normalized_similarity_zero_degree() {
        let sim = array![[0.0, 0.0], [0.0, 0.0]];
        let degrees = degree_vector(&sim.view());

        let result = normalized_similarity(&sim.view(), &degrees.view());
        assert!(matches!(result, Err(KMeansError::InvalidInput(_))));
    }

    #[test]
    fn test_normalized_similarity_shape_mismatch() {
        let sim = array![[0.0, 0.5], [0.5, 0.0]];
        let degrees = array![1.0, 1.0, 1.0];

        let result = normalized_similarity(&sim.view(), &degrees.view());
        assert!(matches!(result, Err(KMeansError::InvalidDimensions(_))));
    }

    #[test]
    fn test_single_point_is_degenerate() {
        let data = array![[1.0, 2.0]];
        let result = normalized_similarity_from_data(&data.view());
        assert!(matches!(result, Err(KMeansError::InvalidInput(_))));
    }
}
