use crate::cluster::Cluster;
use crate::config::{EmptyClusterPolicy, KMeansConfig};
use crate::distance::{nearest_centroids, squared_euclidean};
use crate::error::KMeansError;
use crate::point::{convert_to_points, Point};
use ndarray::{Array1, Array2, ArrayView2};
use tracing::{debug, info, warn};

/// Result of the k-means algorithm
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Final centroids, one row per cluster in cluster-index order
    pub centroids: Array2<f64>,
    /// Cluster index of every input row
    pub labels: Array1<usize>,
    /// Number of reassignment + update passes that ran
    pub n_iterations: usize,
    /// Whether every cluster converged before the iteration cap
    pub converged: bool,
    /// Sum of squared distances from the points to their centroid
    pub inertia: f64,
}

/// Lifecycle of a [`KMeansState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Clusters are seeded, no pass has run yet
    Running,
    /// At least one pass ran and the loop may continue
    Iterating,
    /// Converged or out of iterations
    Done,
}

/// Seed `k` clusters from the first `k` points and assign the rest.
///
/// Point `i < k` becomes the centroid and only member of cluster `i`. Every
/// later point then joins its nearest cluster (the centroids do not move while
/// this happens), and finally each cluster recomputes its centroid once.
///
/// # Panics
///
/// Panics if `points` holds fewer than `k` points.
pub fn initialize_clusters(k: usize, points: &mut [Point]) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = points[..k]
        .iter()
        .map(|point| Cluster::new(point.values().to_owned()))
        .collect();

    for (idx, (cluster, point)) in clusters.iter_mut().zip(points.iter_mut()).enumerate() {
        cluster.add_member(idx);
        point.set_cluster(idx);
    }

    for (idx, point) in points.iter_mut().enumerate().skip(k) {
        assign_point_to_cluster(idx, point, &mut clusters);
    }

    // Every cluster still holds its seed point, so none of these can be empty
    for cluster in &mut clusters {
        cluster.update_centroid(points);
    }

    clusters
}

/// Move the point with index `index` to its nearest cluster.
///
/// Ties go to the cluster that comes first. Returns `true` if the point
/// changed cluster; the new cluster has then gained the point, but the caller
/// still has to remove it from the cluster it came from.
pub fn assign_point_to_cluster(index: usize, point: &mut Point, clusters: &mut [Cluster]) -> bool {
    let mut best: Option<(usize, f64)> = None;
    for (cluster_idx, cluster) in clusters.iter().enumerate() {
        let dist = cluster.calculate_distance(point);
        if best.map_or(true, |(_, best_dist)| dist < best_dist) {
            best = Some((cluster_idx, dist));
        }
    }

    let Some((target, _)) = best else {
        return false;
    };
    if point.cluster() == Some(target) {
        return false;
    }

    clusters[target].add_member(index);
    point.set_cluster(target);
    true
}

/// State of one Lloyd's k-means run.
///
/// Holds the points, the clusters and the loop variables so a run can be
/// driven one pass at a time with [`step`](Self::step) or to the end with
/// [`run`](Self::run).
#[derive(Debug, Clone)]
pub struct KMeansState {
    config: KMeansConfig,
    points: Vec<Point>,
    clusters: Vec<Cluster>,
    n_features: usize,
    iteration: usize,
    converged: bool,
    phase: Phase,
    /// Cluster and pass of the empty-cluster failure that ended the run
    failure: Option<(usize, usize)>,
}

impl KMeansState {
    /// Convert `data` to points and seed the clusters.
    ///
    /// # Errors
    ///
    /// Returns an error if k is 0, if there are fewer rows than k or if the
    /// rows have no features.
    pub fn new(data: &ArrayView2<f64>, config: &KMeansConfig) -> Result<Self, KMeansError> {
        let n_samples = data.nrows();
        let n_features = data.ncols();
        let k = config.k;

        if k == 0 {
            return Err(KMeansError::InvalidK("k must be greater than 0".to_string()));
        }

        if n_samples < k {
            return Err(KMeansError::InsufficientData(format!(
                "Number of samples ({}) is less than k ({})",
                n_samples, k
            )));
        }

        if n_features == 0 {
            return Err(KMeansError::InvalidDimensions(
                "points must have at least one feature".to_string(),
            ));
        }

        debug!(n_samples, n_features, k, "seeding clusters from the first k points");

        let mut points = convert_to_points(data);
        let clusters = initialize_clusters(k, &mut points);

        let phase = if config.max_iters == 0 {
            Phase::Done
        } else {
            Phase::Running
        };

        Ok(Self {
            config: config.clone(),
            points,
            clusters,
            n_features,
            iteration: 0,
            converged: false,
            phase,
            failure: None,
        })
    }

    /// Run one full reassignment + centroid-update pass.
    ///
    /// Returns whether every cluster converged in this pass. Once the state is
    /// [`Phase::Done`] this is a no-op, except that a run that failed keeps
    /// returning its error.
    pub fn step(&mut self) -> Result<bool, KMeansError> {
        if let Some(err) = self.failure() {
            return Err(err);
        }
        if self.phase == Phase::Done {
            return Ok(self.converged);
        }

        let mut moved = 0usize;
        for idx in 0..self.points.len() {
            let former = self.points[idx].cluster();
            if assign_point_to_cluster(idx, &mut self.points[idx], &mut self.clusters) {
                if let Some(former) = former {
                    self.clusters[former].remove_member(idx);
                }
                moved += 1;
            }
        }

        if let Err(err) = self.resolve_empty_clusters() {
            if let KMeansError::EmptyCluster { cluster, iteration } = err {
                self.failure = Some((cluster, iteration));
            }
            self.phase = Phase::Done;
            return Err(err);
        }

        let mut converged = true;
        for cluster in &mut self.clusters {
            if !cluster.update_centroid(&self.points) {
                // Only a frozen cluster can still be empty here
                cluster.hold_centroid();
            }
            converged &= cluster.has_converged();
        }

        self.converged = converged;
        self.iteration += 1;

        let n_converged = self.clusters.iter().filter(|c| c.has_converged()).count();
        debug!(
            iteration = self.iteration,
            moved,
            n_converged,
            k = self.clusters.len(),
            "k-means pass"
        );

        if self.converged {
            info!(iterations = self.iteration, "k-means converged");
            self.phase = Phase::Done;
        } else if self.iteration >= self.config.max_iters {
            info!(
                iterations = self.iteration,
                "k-means reached the iteration cap without converging"
            );
            self.phase = Phase::Done;
        } else {
            self.phase = Phase::Iterating;
        }

        Ok(self.converged)
    }

    /// Iterate until convergence or `max_iters` passes
    pub fn run(mut self) -> Result<KMeansResult, KMeansError> {
        if let Some(err) = self.failure() {
            return Err(err);
        }
        while self.phase != Phase::Done {
            self.step()?;
        }

        Ok(KMeansResult {
            centroids: self.centroids(),
            labels: self.labels(),
            n_iterations: self.iteration,
            converged: self.converged,
            inertia: self.inertia(),
        })
    }

    fn resolve_empty_clusters(&mut self) -> Result<(), KMeansError> {
        let iteration = self.iteration + 1;

        for cluster_idx in 0..self.clusters.len() {
            if !self.clusters[cluster_idx].is_empty() {
                continue;
            }

            match self.config.empty_cluster {
                EmptyClusterPolicy::Fail => {
                    return Err(KMeansError::EmptyCluster {
                        cluster: cluster_idx,
                        iteration,
                    });
                }
                EmptyClusterPolicy::Freeze => {
                    warn!(cluster = cluster_idx, iteration, "freezing centroid of empty cluster");
                }
                EmptyClusterPolicy::ReseedFarthest => {
                    let point_idx = self.farthest_point().ok_or(KMeansError::EmptyCluster {
                        cluster: cluster_idx,
                        iteration,
                    })?;
                    if let Some(former) = self.points[point_idx].cluster() {
                        self.clusters[former].remove_member(point_idx);
                    }
                    self.clusters[cluster_idx].add_member(point_idx);
                    self.points[point_idx].set_cluster(cluster_idx);

                    warn!(
                        cluster = cluster_idx,
                        point = point_idx,
                        iteration,
                        "reseeded empty cluster from the farthest point"
                    );
                }
            }
        }

        Ok(())
    }

    /// Point farthest from its own centroid among clusters that can spare one
    fn farthest_point(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for (idx, point) in self.points.iter().enumerate() {
            let Some(cluster_idx) = point.cluster() else {
                continue;
            };
            let cluster = &self.clusters[cluster_idx];
            if cluster.len() < 2 {
                continue;
            }

            let dist = cluster.calculate_distance(point);
            if best.map_or(true, |(_, best_dist)| dist > best_dist) {
                best = Some((idx, dist));
            }
        }

        best.map(|(idx, _)| idx)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Number of completed passes
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The error that ended the run, if a pass failed
    pub fn failure(&self) -> Option<KMeansError> {
        self.failure.map(|(cluster, iteration)| KMeansError::EmptyCluster { cluster, iteration })
    }

    /// Current centroids, one row per cluster
    pub fn centroids(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.clusters.len(), self.n_features), |(i, j)| {
            self.clusters[i].centroid()[j]
        })
    }

    /// Current cluster index of every point
    pub fn labels(&self) -> Array1<usize> {
        self.points
            .iter()
            .map(|point| point.cluster().unwrap_or_default())
            .collect()
    }

    /// Sum of squared distances from every point to the centroid of its cluster
    pub fn inertia(&self) -> f64 {
        self.clusters
            .iter()
            .map(|cluster| {
                cluster
                    .members()
                    .iter()
                    .map(|&idx| squared_euclidean(&cluster.centroid(), &self.points[idx].values()))
                    .sum::<f64>()
            })
            .sum()
    }
}

/// Run Lloyd's k-means on `data` with first-k seeding
pub fn kmeans_lloyd(
    data: &ArrayView2<f64>,
    config: &KMeansConfig,
) -> Result<KMeansResult, KMeansError> {
    KMeansState::new(data, config)?.run()
}

/// Predict cluster assignments for new data using trained centroids
pub fn predict_labels(data: &ArrayView2<f64>, centroids: &ArrayView2<f64>) -> Array1<usize> {
    nearest_centroids(data, centroids)
}
