use thiserror::Error;

/// Error types for the lloyd-kmeans library
#[derive(Error, Debug)]
pub enum KMeansError {
    /// The number of clusters k is invalid (must be > 0)
    #[error("Invalid k value: {0}")]
    InvalidK(String),

    /// Not enough data points for the requested number of clusters
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Model has not been fitted yet
    #[error("Model has not been fitted. Call train() or fit() first.")]
    NotFitted,

    /// Dimension mismatch between data and model, or ragged input rows
    #[error("Dimension mismatch: {0}")]
    InvalidDimensions(String),

    /// A cluster lost all of its members and the policy does not recover from it
    #[error("Cluster {cluster} became empty during iteration {iteration}")]
    EmptyCluster { cluster: usize, iteration: usize },

    /// Numerically degenerate input (zero degree, non-positive average, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A value in a text input could not be parsed as a number
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    ReadNpy(#[from] ndarray_npy::ReadNpyError),
}
