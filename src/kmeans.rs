use crate::algorithm::{kmeans_lloyd, predict_labels, KMeansResult};
use crate::config::KMeansConfig;
use crate::error::KMeansError;
use ndarray::{Array1, Array2, ArrayView2};

/// Lloyd's k-means clustering compatible with ndarray.
///
/// Clusters are seeded from the first k rows of the training data, so results
/// depend only on the input order and never on a random state.
///
/// # Example
///
/// ```
/// use lloyd_kmeans::KMeans;
/// use ndarray::array;
///
/// let data = array![[0.0, 0.0], [10.0, 0.0], [0.0, 1.0], [10.0, 1.0]];
///
/// let mut kmeans = KMeans::new(2);
/// kmeans.train(&data.view()).unwrap();
///
/// let centroids = kmeans.centroids().unwrap();
/// assert_eq!(centroids.row(0).to_vec(), vec![0.0, 0.5]);
/// assert_eq!(centroids.row(1).to_vec(), vec![10.0, 0.5]);
/// ```
pub struct KMeans {
    /// Model configuration
    config: KMeansConfig,

    /// Number of features (dimensions), 0 until the first successful train call
    d: usize,

    /// Outcome of the last training run (None if not yet fitted)
    result: Option<KMeansResult>,
}

impl KMeans {
    /// Create a new KMeans instance with default configuration.
    ///
    /// # Panics
    ///
    /// Panics if `k` is 0.
    pub fn new(k: usize) -> Self {
        Self::with_config(KMeansConfig::new(k))
    }

    /// Create a new KMeans instance with custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config.k` is 0.
    pub fn with_config(config: KMeansConfig) -> Self {
        assert!(config.k > 0, "k must be greater than 0");

        Self {
            config,
            d: 0,
            result: None,
        }
    }

    /// Train the model on the given data.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Number of samples is less than k
    /// - Data dimensions don't match (for subsequent calls)
    /// - A cluster empties out under [`EmptyClusterPolicy::Fail`](crate::EmptyClusterPolicy::Fail)
    pub fn train(&mut self, data: &ArrayView2<f64>) -> Result<(), KMeansError> {
        let n_features = data.ncols();

        // A fitted model only accepts data of the width it was trained on
        if self.result.is_some() && n_features != self.d {
            return Err(KMeansError::InvalidDimensions(format!(
                "Expected {} features, got {}",
                self.d, n_features
            )));
        }

        let result = kmeans_lloyd(data, &self.config)?;

        self.d = n_features;
        self.result = Some(result);
        Ok(())
    }

    /// Fit the model to the data. Equivalent to `train()`, returns `&mut Self`
    /// for chaining.
    pub fn fit(&mut self, data: &ArrayView2<f64>) -> Result<&mut Self, KMeansError> {
        self.train(data)?;
        Ok(self)
    }

    /// Nearest-centroid label for every row of `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model has not been fitted yet or if the data
    /// dimensions don't match the training data.
    pub fn predict(&self, data: &ArrayView2<f64>) -> Result<Array1<usize>, KMeansError> {
        let result = self.result.as_ref().ok_or(KMeansError::NotFitted)?;

        let n_features = data.ncols();
        if n_features != self.d {
            return Err(KMeansError::InvalidDimensions(format!(
                "Expected {} features, got {}",
                self.d, n_features
            )));
        }

        Ok(predict_labels(data, &result.centroids.view()))
    }

    /// Train, then return the cluster each training row ended up in.
    ///
    /// These are the engine's own assignments, which can differ from
    /// `predict()` when the run stopped at the iteration cap.
    pub fn fit_predict(&mut self, data: &ArrayView2<f64>) -> Result<Array1<usize>, KMeansError> {
        self.train(data)?;
        self.labels().cloned().ok_or(KMeansError::NotFitted)
    }

    /// Centroids of the fitted model, one row per cluster
    pub fn centroids(&self) -> Option<&Array2<f64>> {
        self.result.as_ref().map(|r| &r.centroids)
    }

    /// Cluster of every training row from the last run
    pub fn labels(&self) -> Option<&Array1<usize>> {
        self.result.as_ref().map(|r| &r.labels)
    }

    /// Number of passes the last run took
    pub fn n_iterations(&self) -> Option<usize> {
        self.result.as_ref().map(|r| r.n_iterations)
    }

    /// Whether the last run converged before the iteration cap
    pub fn converged(&self) -> Option<bool> {
        self.result.as_ref().map(|r| r.converged)
    }

    pub fn inertia(&self) -> Option<f64> {
        self.result.as_ref().map(|r| r.inertia)
    }

    /// Get the number of clusters.
    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Get the number of features (dimensions).
    pub fn d(&self) -> usize {
        self.d
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }
}
