//! Seeding and consuming symNMF association matrices.
//!
//! The factorization routine is external to this crate and is reached through
//! [`AssociationRefiner`]. Its output is an alternative, soft clustering of the
//! same points and is never fed back into the k-means engine.

use crate::config::AssociationConfig;
use crate::error::KMeansError;
use ndarray::{Array1, Array2, ArrayView2};
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// External routine that refines an association matrix.
///
/// Given the normalized similarity matrix `W` (N x N) and a non-negative
/// initial association matrix `H0` (N x K), returns the refined N x K matrix.
pub trait AssociationRefiner {
    fn refine(
        &self,
        normalized: &ArrayView2<f64>,
        initial: Array2<f64>,
    ) -> Result<Array2<f64>, KMeansError>;
}

/// Element-wise mean, `None` for an empty matrix
pub fn matrix_average(matrix: &ArrayView2<f64>) -> Option<f64> {
    matrix.mean()
}

/// Draw the initial N x K association matrix.
///
/// Entries are uniform in `[0, 2 * sqrt(m / k))` where `m` is the element-wise
/// average of `normalized`. The draws come from a `ChaCha8Rng` seeded with
/// `config.seed`, row by row.
pub fn initialize_association_matrix(
    normalized: &ArrayView2<f64>,
    config: &AssociationConfig,
) -> Result<Array2<f64>, KMeansError> {
    let k = config.k;
    if k == 0 {
        return Err(KMeansError::InvalidK("k must be greater than 0".to_string()));
    }

    let average = matrix_average(normalized).ok_or_else(|| {
        KMeansError::InvalidInput("normalized similarity matrix is empty".to_string())
    })?;
    if !(average.is_finite() && average > 0.0) {
        return Err(KMeansError::InvalidInput(format!(
            "normalized similarity average must be positive, got {}",
            average
        )));
    }

    let upper_bound = 2.0 * (average / k as f64).sqrt();
    let uniform = Uniform::new(0.0, upper_bound);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    Ok(Array2::from_shape_simple_fn((normalized.nrows(), k), || {
        uniform.sample(&mut rng)
    }))
}

/// Seed an association matrix and hand it to `refiner`.
///
/// # Errors
///
/// Fails if `normalized` is not square, if seeding fails, if the refiner
/// fails, or if the refiner returns something other than N x K.
pub fn refine_association<R>(
    refiner: &R,
    normalized: &ArrayView2<f64>,
    config: &AssociationConfig,
) -> Result<Array2<f64>, KMeansError>
where
    R: AssociationRefiner + ?Sized,
{
    let n = normalized.nrows();
    if normalized.ncols() != n {
        return Err(KMeansError::InvalidDimensions(format!(
            "normalized similarity must be square, got {}x{}",
            n,
            normalized.ncols()
        )));
    }

    let initial = initialize_association_matrix(normalized, config)?;
    let refined = refiner.refine(normalized, initial)?;

    if refined.dim() != (n, config.k) {
        return Err(KMeansError::InvalidDimensions(format!(
            "refined association matrix is {}x{}, expected {}x{}",
            refined.nrows(),
            refined.ncols(),
            n,
            config.k
        )));
    }

    Ok(refined)
}

/// Hard clustering from an association matrix: the column of each row's
/// largest entry, first one on ties
pub fn hard_labels(association: &ArrayView2<f64>) -> Array1<usize> {
    association
        .outer_iter()
        .map(|row| {
            let mut best = 0;
            for (j, &value) in row.iter().enumerate() {
                if value > row[best] {
                    best = j;
                }
            }
            best
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn normalized() -> Array2<f64> {
        array![[0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]]
    }

    #[test]
    fn test_matrix_average() {
        let m = array![[1.0, 2.0], [3.0, 6.0]];
        assert_relative_eq!(matrix_average(&m.view()).unwrap(), 3.0, epsilon = 1e-12);
        assert!(matrix_average(&Array2::<f64>::zeros((0, 0)).view()).is_none());
    }

    #[test]
    fn test_initialize_association_bounds() {
        let w = normalized();
        let config = AssociationConfig::new(2);

        let h = initialize_association_matrix(&w.view(), &config).unwrap();
        assert_eq!(h.dim(), (3, 2));

        // average is 1/3, so the bound is 2 * sqrt(1/6)
        let upper = 2.0 * (1.0f64 / 6.0).sqrt();
        for &value in h.iter() {
            assert!((0.0..upper).contains(&value), "{} out of range", value);
        }
    }

    #[test]
    fn test_initialize_association_is_seeded() {
        let w = normalized();

        let h1 = initialize_association_matrix(&w.view(), &AssociationConfig::new(2)).unwrap();
        let h2 = initialize_association_matrix(&w.view(), &AssociationConfig::new(2)).unwrap();
        assert_eq!(h1, h2);

        let h3 = initialize_association_matrix(
            &w.view(),
            &AssociationConfig::new(2).with_seed(99),
        )
        .unwrap();
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_initialize_association_rejects_degenerate() {
        let zeros = Array2::<f64>::zeros((3, 3));
        let result = initialize_association_matrix(&zeros.view(), &AssociationConfig::new(2));
        assert!(matches!(result, Err(KMeansError::InvalidInput(_))));

        let result =
            initialize_association_matrix(&normalized().view(), &AssociationConfig::new(0));
        assert!(matches!(result, Err(KMeansError::InvalidK(_))));
    }

    /// Doubles every entry
    struct Doubling;

    impl AssociationRefiner for Doubling {
        fn refine(
            &self,
            normalized: &ArrayView2<f64>,
            initial: Array2<f64>,
        ) -> Result<Array2<f64>, KMeansError> {
            assert_eq!(normalized.nrows(), initial.nrows());
            Ok(initial * 2.0)
        }
    }

    /// Returns a matrix of the wrong width
    struct WrongShape;

    impl AssociationRefiner for WrongShape {
        fn refine(
            &self,
            normalized: &ArrayView2<f64>,
            _initial: Array2<f64>,
        ) -> Result<Array2<f64>, KMeansError> {
            Ok(Array2::zeros((normalized.nrows(), 5)))
        }
    }

    struct Diverging;

    impl AssociationRefiner for Diverging {
        fn refine(
            &self,
            _normalized: &ArrayView2<f64>,
            _initial: Array2<f64>,
        ) -> Result<Array2<f64>, KMeansError> {
            Err(KMeansError::InvalidInput("diverged".to_string()))
        }
    }

    #[test]
    fn test_refine_association_calls_refiner() {
        let w = normalized();
        let config = AssociationConfig::new(2);

        let seeded = initialize_association_matrix(&w.view(), &config).unwrap();
        let refined = refine_association(&Doubling, &w.view(), &config).unwrap();
        assert_eq!(refined, seeded * 2.0);
    }

    #[test]
    fn test_refine_association_checks_shape() {
        let w = normalized();

        let result = refine_association(&WrongShape, &w.view(), &AssociationConfig::new(2));
        assert!(matches!(result, Err(KMeansError::InvalidDimensions(_))));

        let not_square = Array2::<f64>::ones((3, 2));
        let result = refine_association(&Doubling, &not_square.view(), &AssociationConfig::new(2));
        assert!(matches!(result, Err(KMeansError::InvalidDimensions(_))));
    }

    #[test]
    fn test_refine_association_propagates_errors() {
        let refiner: &dyn AssociationRefiner = &Diverging;

        let result = refine_association(refiner, &normalized().view(), &AssociationConfig::new(2));
        assert!(matches!(result, Err(KMeansError::InvalidInput(_))));
    }

    #[test]
    fn test_hard_labels() {
        let h = array![[0.1, 0.9], [0.7, 0.2], [0.5, 0.5]];
        assert_eq!(hard_labels(&h.view()).to_vec(), vec![1, 0, 0]);
    }
}
