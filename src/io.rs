//! Reading data points and printing matrices.

use crate::error::KMeansError;
use ndarray::{Array2, ArrayView2};
use ndarray_npy::ReadNpyExt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Parse comma-separated points, one per line. Blank lines are skipped.
///
/// # Errors
///
/// [`KMeansError::Parse`] for a value that is not a number and
/// [`KMeansError::InvalidDimensions`] when rows have different lengths.
pub fn parse_points(text: &str) -> Result<Array2<f64>, KMeansError> {
    let mut values = Vec::new();
    let mut n_rows = 0usize;
    let mut n_features: Option<usize> = None;

    for (line_idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let row = line
            .split(',')
            .map(|field| {
                field.trim().parse::<f64>().map_err(|e| KMeansError::Parse {
                    line: line_idx + 1,
                    message: format!("{:?}: {}", field, e),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        match n_features {
            None => n_features = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(KMeansError::InvalidDimensions(format!(
                    "line {} has {} values, expected {}",
                    line_idx + 1,
                    row.len(),
                    expected
                )));
            }
            Some(_) => {}
        }

        values.extend(row);
        n_rows += 1;
    }

    Array2::from_shape_vec((n_rows, n_features.unwrap_or(0)), values)
        .map_err(|e| KMeansError::InvalidDimensions(e.to_string()))
}

/// Load points from `path`: `.npy` files as 2-D `f64` arrays, anything else as text
pub fn read_points(path: &Path) -> Result<Array2<f64>, KMeansError> {
    let is_npy = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("npy"));

    if is_npy {
        let reader = BufReader::new(File::open(path)?);
        Ok(Array2::<f64>::read_npy(reader)?)
    } else {
        parse_points(&std::fs::read_to_string(path)?)
    }
}

/// One line per row, values separated by commas with four decimals
pub fn format_matrix(matrix: &ArrayView2<f64>) -> String {
    matrix
        .outer_iter()
        .map(|row| {
            row.iter()
                .map(|value| format!("{:.4}", value))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
