use ndarray::{Array1, ArrayView1, ArrayView2};

/// A data point: fixed coordinates plus the index of the cluster it currently belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    values: Array1<f64>,
    cluster: Option<usize>,
}

impl Point {
    /// Create an unassigned point
    pub fn new(values: Array1<f64>) -> Self {
        Self {
            values,
            cluster: None,
        }
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Index of the owning cluster, `None` before initialization
    pub fn cluster(&self) -> Option<usize> {
        self.cluster
    }

    /// Dimensionality of the point
    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn set_cluster(&mut self, cluster: usize) {
        self.cluster = Some(cluster);
    }
}

/// One unassigned [`Point`] per row of `data`
pub fn convert_to_points(data: &ArrayView2<f64>) -> Vec<Point> {
    data.outer_iter()
        .map(|row| Point::new(row.to_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_convert_to_points() {
        let data = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let points = convert_to_points(&data.view());

        assert_eq!(points.len(), 3);
        for (point, row) in points.iter().zip(data.outer_iter()) {
            assert_eq!(point.values(), row);
            assert_eq!(point.dim(), 2);
            assert_eq!(point.cluster(), None);
        }
    }

    #[test]
    fn test_convert_empty() {
        let data = ndarray::Array2::<f64>::zeros((0, 3));
        assert!(convert_to_points(&data.view()).is_empty());
    }
}
