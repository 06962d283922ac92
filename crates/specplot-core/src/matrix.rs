use serde::{Deserialize, Serialize};

use crate::error::PlotError;

/// Dense row-major 2-D array of samples.
///
/// Used for resampled SCV (frequency × repetition) and spectral histograms
/// (power bin × frequency).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Build a matrix from nested rows. Ragged rows are rejected.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, PlotError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(PlotError::shape(format!("matrix row {i}"), n_cols, row.len()));
            }
            data.extend(row);
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    /// A `rows × cols` matrix filled with `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Copy column `col` out as a vector.
    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|r| self.data[r * self.cols + col]).collect()
    }

    /// Mean across each row.
    pub fn row_means(&self) -> Vec<f64> {
        (0..self.rows)
            .map(|r| {
                let row = self.row(r);
                if row.is_empty() {
                    f64::NAN
                } else {
                    row.iter().sum::<f64>() / row.len() as f64
                }
            })
            .collect()
    }

    /// Element-wise transform into a new matrix.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Minimum and maximum over finite entries, if any.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = PlotError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(m: Matrix) -> Self {
        (0..m.rows).map(|r| m.row(r).to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn shape_and_access() {
        let m = sample();
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.get(1, 2), Some(6.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(m.column(1), vec![2.0, 5.0]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(err, PlotError::shape("matrix row 1", 2, 1));
    }

    #[test]
    fn row_means_average_columns() {
        assert_eq!(sample().row_means(), vec![2.0, 5.0]);
    }

    #[test]
    fn finite_range_skips_infinities() {
        let m = sample().map(|v| if v == 1.0 { f64::NEG_INFINITY } else { v.log10() });
        let (lo, hi) = m.finite_range().unwrap();
        assert!((lo - 2f64.log10()).abs() < 1e-12);
        assert!((hi - 6f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn deserializes_from_nested_arrays() {
        let m: Matrix = serde_json::from_str("[[1, 2], [3, 4]]").unwrap();
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert!(serde_json::from_str::<Matrix>("[[1, 2], [3]]").is_err());
    }
}
