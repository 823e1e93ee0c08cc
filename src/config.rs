/// What the engine does when a cluster loses all of its members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyClusterPolicy {
    /// Abort the run with [`KMeansError::EmptyCluster`](crate::KMeansError::EmptyCluster)
    #[default]
    Fail,

    /// Keep the previous centroid for the pass. The cluster counts as converged
    /// since its centroid did not move.
    Freeze,

    /// Move the point farthest from its own centroid (taken from a cluster with
    /// at least two members) into the empty cluster and center it there.
    ReseedFarthest,
}

/// Configuration for the Lloyd k-means engine
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,

    /// Maximum number of reassignment + centroid-update passes
    pub max_iters: usize,

    /// Behavior when a cluster becomes empty after reassignment
    pub empty_cluster: EmptyClusterPolicy,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 8,
            max_iters: 300,
            empty_cluster: EmptyClusterPolicy::Fail,
        }
    }
}

impl KMeansConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the empty cluster policy
    pub fn with_empty_cluster(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_cluster = policy;
        self
    }
}

/// Configuration for seeding a symNMF association matrix
#[derive(Debug, Clone)]
pub struct AssociationConfig {
    /// Number of columns (clusters) of the association matrix
    pub k: usize,

    /// Seed for the uniform draws
    pub seed: u64,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self { k: 2, seed: 1234 }
    }
}

impl AssociationConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kmeans_config_builders() {
        let config = KMeansConfig::new(3)
            .with_max_iters(10)
            .with_empty_cluster(EmptyClusterPolicy::Freeze);

        assert_eq!(config.k, 3);
        assert_eq!(config.max_iters, 10);
        assert_eq!(config.empty_cluster, EmptyClusterPolicy::Freeze);
    }

    #[test]
    fn test_defaults() {
        let config = KMeansConfig::default();
        assert_eq!(config.max_iters, 300);
        assert_eq!(config.empty_cluster, EmptyClusterPolicy::Fail);

        assert_eq!(AssociationConfig::new(4).seed, 1234);
    }
}
