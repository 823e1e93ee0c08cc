//! Basic example demonstrating lloyd-kmeans usage
//!
//! Run with: cargo run --example basic --release

use lloyd_kmeans::affinity::normalized_similarity_from_data;
use lloyd_kmeans::io::format_matrix;
use lloyd_kmeans::{EmptyClusterPolicy, KMeans, KMeansConfig};
use ndarray::{s, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn main() {
    println!("=== lloyd-kmeans example ===\n");

    // 3 clusters in 2D; rows cycle through the centers so the first three
    // rows seed one cluster each
    let n_samples = 300;
    let n_features = 2;
    let n_clusters = 3;
    let centers = [[-5.0, -5.0], [0.0, 5.0], [5.0, -5.0]];

    println!("Generating {} samples with {} features...", n_samples, n_features);

    let noise = Array2::random((n_samples, n_features), Uniform::new(-1.0, 1.0));
    let data = Array2::from_shape_fn((n_samples, n_features), |(i, j)| {
        centers[i % n_clusters][j] + noise[[i, j]]
    });

    println!("True cluster centers:");
    for (i, center) in centers.iter().enumerate() {
        println!("  Cluster {}: ({:.2}, {:.2})", i, center[0], center[1]);
    }
    println!();

    let config = KMeansConfig::new(n_clusters)
        .with_max_iters(100)
        .with_empty_cluster(EmptyClusterPolicy::ReseedFarthest);

    println!("Running k-means with k={}...\n", n_clusters);

    let mut kmeans = KMeans::with_config(config);
    let labels = kmeans.fit_predict(&data.view()).expect("Training failed");

    println!(
        "Finished after {} iterations (converged: {})",
        kmeans.n_iterations().unwrap_or_default(),
        kmeans.converged().unwrap_or_default()
    );
    println!("Inertia: {:.4}\n", kmeans.inertia().unwrap_or_default());

    println!("Learned centroids:");
    let centroids = kmeans.centroids().unwrap();
    for (i, row) in centroids.outer_iter().enumerate() {
        println!("  Centroid {}: ({:.4}, {:.4})", i, row[0], row[1]);
    }
    println!();

    let mut cluster_counts = vec![0usize; n_clusters];
    for &label in labels.iter() {
        cluster_counts[label] += 1;
    }

    println!("Cluster distribution:");
    for (i, count) in cluster_counts.iter().enumerate() {
        let share = (*count as f64 / n_samples as f64) * 100.0;
        println!("  Cluster {}: {} samples ({:.1}%)", i, count, share);
    }
    println!();

    // Points far from every training point still get the nearest centroid
    let unseen = ndarray::array![[-6.0, -4.0], [1.0, 7.0], [8.0, -8.0]];
    let predicted = kmeans.predict(&unseen.view()).expect("Prediction failed");
    println!("Predicted clusters for unseen points: {:?}\n", predicted.to_vec());

    // Affinity input for a symNMF comparison, on the first six samples
    let sample = data.slice(s![..6, ..]);
    let normalized = normalized_similarity_from_data(&sample).expect("Normalization failed");
    println!("Normalized similarity of the first 6 samples:");
    println!("{}", format_matrix(&normalized.view()));

    println!("\n=== Done! ===");
}
