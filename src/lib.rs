//! # lloyd-kmeans
//!
//! A deterministic Lloyd's k-means engine in Rust, compatible with ndarray,
//! plus the affinity helpers used to compare it against symmetric NMF.
//!
//! ## Features
//!
//! - **Deterministic seeding**: the first k rows seed the clusters, no randomness
//!   in the engine
//! - **Explicit run state**: [`KMeansState`] exposes points, clusters and the
//!   loop phase so a run can be driven one pass at a time
//! - **Configurable empty-cluster handling**: abort the run by default, or keep
//!   the old centroid, or reseed from the farthest point
//! - **symNMF inputs**: similarity, degree and normalized similarity matrices,
//!   and a seeded initial association matrix for an external factorization
//!
//! ## Example
//!
//! ```rust
//! use lloyd_kmeans::{KMeans, KMeansConfig};
//! use ndarray::array;
//!
//! let data = array![[0.0, 0.0], [10.0, 0.0], [0.0, 1.0], [10.0, 1.0]];
//!
//! let mut kmeans = KMeans::with_config(KMeansConfig::new(2).with_max_iters(10));
//! let labels = kmeans.fit_predict(&data.view()).unwrap();
//! assert_eq!(labels.to_vec(), vec![0, 1, 0, 1]);
//! ```
//!
//! ## Stepping through a run
//!
//! ```rust
//! use lloyd_kmeans::{KMeansConfig, KMeansState, Phase};
//! use ndarray::array;
//!
//! let data = array![[0.0], [1.0], [2.0], [10.0], [11.0], [12.0]];
//! let mut state = KMeansState::new(&data.view(), &KMeansConfig::new(2)).unwrap();
//!
//! while state.phase() != Phase::Done {
//!     state.step().unwrap();
//!     println!("pass {}: inertia {:.4}", state.iteration(), state.inertia());
//! }
//! assert!(state.converged());
//! ```

pub mod affinity;
mod algorithm;
pub mod association;
mod cluster;
mod config;
pub mod distance;
mod error;
pub mod io;
mod kmeans;
mod point;

pub use algorithm::{
    assign_point_to_cluster, initialize_clusters, kmeans_lloyd, predict_labels, KMeansResult,
    KMeansState, Phase,
};
pub use cluster::Cluster;
pub use config::{AssociationConfig, EmptyClusterPolicy, KMeansConfig};
pub use error::KMeansError;
pub use kmeans::KMeans;
pub use point::{convert_to_points, Point};
