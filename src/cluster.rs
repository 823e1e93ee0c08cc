use crate::distance::{check_convergence, euclidean_distance};
use crate::point::Point;
use ndarray::{Array1, ArrayView1};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// A cluster: its centroid and the indices of the points currently assigned to it.
///
/// Members are stored as indices into the point list of the run, so the
/// cluster never holds coordinates of its own besides the centroid. Each
/// member's slot in `members` is tracked so insert and remove are O(1).
#[derive(Debug, Clone)]
pub struct Cluster {
    centroid: Array1<f64>,
    members: Vec<usize>,
    slots: HashMap<usize, usize>,
    convergence: bool,
}

impl Cluster {
    /// Create an empty cluster centered on `centroid`
    pub fn new(centroid: Array1<f64>) -> Self {
        Self {
            centroid,
            members: Vec::new(),
            slots: HashMap::new(),
            convergence: false,
        }
    }

    pub fn centroid(&self) -> ArrayView1<'_, f64> {
        self.centroid.view()
    }

    /// Indices of the member points.
    ///
    /// Members keep their insertion order until one is removed; the last
    /// member then takes the removed one's slot. Centroid sums follow this
    /// order, which depends only on the sequence of moves.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the last centroid update moved the centroid by less than the threshold
    pub fn has_converged(&self) -> bool {
        self.convergence
    }

    pub(crate) fn add_member(&mut self, point: usize) -> bool {
        match self.slots.entry(point) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(self.members.len());
                self.members.push(point);
                true
            }
        }
    }

    pub(crate) fn remove_member(&mut self, point: usize) -> bool {
        let Some(slot) = self.slots.remove(&point) else {
            return false;
        };
        self.members.swap_remove(slot);
        if let Some(&moved) = self.members.get(slot) {
            self.slots.insert(moved, slot);
        }
        true
    }

    /// Euclidean distance between the centroid and `point`
    pub fn calculate_distance(&self, point: &Point) -> f64 {
        euclidean_distance(&self.centroid.view(), &point.values())
    }

    /// Recompute the centroid as the mean of the member points and re-evaluate convergence.
    ///
    /// `points` is the point list the member indices refer to. Returns `false`
    /// and leaves the cluster untouched when it has no members.
    pub fn update_centroid(&mut self, points: &[Point]) -> bool {
        if self.members.is_empty() {
            return false;
        }

        let mut sum = Array1::<f64>::zeros(self.centroid.len());
        for &idx in &self.members {
            sum += &points[idx].values();
        }
        let new_centroid = sum / self.members.len() as f64;

        self.convergence = check_convergence(&new_centroid.view(), &self.centroid.view());
        self.centroid = new_centroid;
        true
    }

    /// Keep the current centroid for this pass; it did not move, so it counts as converged
    pub(crate) fn hold_centroid(&mut self) {
        self.convergence = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn points(rows: &[[f64; 2]]) -> Vec<Point> {
        rows.iter()
            .map(|r| Point::new(Array1::from(r.to_vec())))
            .collect()
    }

    #[test]
    fn test_calculate_distance() {
        let cluster = Cluster::new(array![1.0, 1.0]);
        let point = Point::new(array![4.0, 5.0]);

        assert_relative_eq!(cluster.calculate_distance(&point), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_update_centroid_mean() {
        let pts = points(&[[0.0, 0.0], [2.0, 4.0], [100.0, 100.0]]);
        let mut cluster = Cluster::new(array![0.0, 0.0]);
        cluster.add_member(0);
        cluster.add_member(1);

        assert!(cluster.update_centroid(&pts));
        assert_relative_eq!(cluster.centroid()[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(cluster.centroid()[1], 2.0, epsilon = 1e-12);
        assert!(!cluster.has_converged());

        // Same members again: the centroid does not move
        assert!(cluster.update_centroid(&pts));
        assert!(cluster.has_converged());
    }

    #[test]
    fn test_update_centroid_small_shift_converges() {
        let pts = points(&[[0.0, 0.0], [0.0, 0.0005]]);
        let mut cluster = Cluster::new(array![0.0, 0.0]);
        cluster.add_member(1);

        assert!(cluster.update_centroid(&pts));
        assert!(cluster.has_converged());
    }

    #[test]
    fn test_update_empty_cluster_is_untouched() {
        let pts = points(&[[3.0, 3.0]]);
        let mut cluster = Cluster::new(array![1.0, 2.0]);

        assert!(!cluster.update_centroid(&pts));
        assert_eq!(cluster.centroid(), array![1.0, 2.0]);
        assert!(!cluster.has_converged());

        cluster.hold_centroid();
        assert!(cluster.has_converged());
        assert_eq!(cluster.centroid(), array![1.0, 2.0]);
    }

    #[test]
    fn test_membership() {
        let mut cluster = Cluster::new(array![0.0]);
        assert!(cluster.is_empty());

        assert!(cluster.add_member(3));
        assert!(cluster.add_member(1));
        assert!(!cluster.add_member(3));
        assert_eq!(cluster.len(), 2);
        assert_eq!(cluster.members(), &[3, 1]);

        assert!(cluster.remove_member(3));
        assert!(!cluster.remove_member(3));
        assert_eq!(cluster.len(), 1);
        assert_eq!(cluster.members(), &[1]);
    }

    #[test]
    fn test_remove_member_moves_last_into_slot() {
        let mut cluster = Cluster::new(array![0.0]);
        for idx in [4, 7, 2, 9] {
            cluster.add_member(idx);
        }

        assert!(cluster.remove_member(7));
        assert_eq!(cluster.members(), &[4, 9, 2]);

        // The moved member is still found at its new slot
        assert!(cluster.remove_member(9));
        assert_eq!(cluster.members(), &[4, 2]);
        assert!(cluster.remove_member(2));
        assert!(cluster.remove_member(4));
        assert!(cluster.is_empty());

        assert!(cluster.add_member(9));
        assert_eq!(cluster.members(), &[9]);
    }
}
