use ndarray::{Array1, ArrayView1, ArrayView2};
use rayon::prelude::*;

/// A centroid that moved by less than this (Euclidean) has converged
pub const CONVERGENCE_THRESHOLD: f64 = 1e-3;

/// Squared Euclidean distance between two vectors of equal length
#[inline]
pub fn squared_euclidean(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean distance between two vectors of equal length
#[inline]
pub fn euclidean_distance(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// True iff the centroid moved strictly less than [`CONVERGENCE_THRESHOLD`]
pub fn check_convergence(new_centroid: &ArrayView1<f64>, old_centroid: &ArrayView1<f64>) -> bool {
    euclidean_distance(new_centroid, old_centroid) < CONVERGENCE_THRESHOLD
}

/// Index of the closest centroid to `point`, or `None` if there are no centroids.
///
/// Ties go to the lowest index: a later centroid only wins with a strictly
/// smaller distance.
pub fn nearest_centroid(point: &ArrayView1<f64>, centroids: &ArrayView2<f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (j, centroid) in centroids.outer_iter().enumerate() {
        let dist = euclidean_distance(point, &centroid);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((j, dist)),
        }
    }

    best.map(|(j, _)| j)
}

/// Nearest-centroid label for every row of `data`.
///
/// Rows are independent and read the centroids only, so they are labelled in
/// parallel.
pub fn nearest_centroids(data: &ArrayView2<f64>, centroids: &ArrayView2<f64>) -> Array1<usize> {
    let labels: Vec<usize> = (0..data.nrows())
        .into_par_iter()
        .map(|i| nearest_centroid(&data.row(i), centroids).unwrap_or(0))
        .collect();

    Array1::from(labels)
}
