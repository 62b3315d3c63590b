//! Dense row-major feature matrix.

use crate::error::TrainingError;

/// Row-major matrix of encoded features with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    values: Vec<f64>,
    n_rows: usize,
}

impl FeatureMatrix {
    /// Build a matrix from row-major values.
    ///
    /// # Errors
    /// Returns [`TrainingError::DimensionMismatch`] when `values` is not
    /// exactly `n_rows * columns.len()` long.
    pub fn new(
        columns: Vec<String>,
        values: Vec<f64>,
        n_rows: usize,
    ) -> Result<Self, TrainingError> {
        let expected = n_rows * columns.len();
        if values.len() != expected {
            return Err(TrainingError::DimensionMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            columns,
            values,
            n_rows,
        })
    }

    /// Build a matrix from individual rows.
    ///
    /// # Errors
    /// Returns [`TrainingError::DimensionMismatch`] if any row's length
    /// differs from the column count.
    pub fn from_rows(columns: Vec<String>, rows: &[Vec<f64>]) -> Result<Self, TrainingError> {
        let width = columns.len();
        let mut values = Vec::with_capacity(rows.len() * width);
        for row in rows {
            if row.len() != width {
                return Err(TrainingError::DimensionMismatch {
                    expected: width,
                    actual: row.len(),
                });
            }
            values.extend_from_slice(row);
        }
        Self::new(columns, values, rows.len())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Value at `(row, col)`. Panics on out-of-range indices.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.n_cols() + col]
    }

    /// One row as a slice. Panics on an out-of-range index.
    pub fn row(&self, row: usize) -> &[f64] {
        let width = self.n_cols();
        &self.values[row * width..(row + 1) * width]
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size
        self.values.chunks_exact(self.n_cols().max(1)).take(self.n_rows)
    }

    /// Copy of one column.
    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.n_rows).map(|row| self.get(row, col)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rows_and_columns_line_up() {
        let m = FeatureMatrix::from_rows(
            cols(&["a", "b"]),
            &[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
        )
        .unwrap();

        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.n_cols(), 2);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.column(1), vec![2.0, 4.0, 6.0]);
        assert_eq!(m.get(2, 0), 5.0);
        assert_eq!(m.rows().count(), 3);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = FeatureMatrix::from_rows(cols(&["a", "b"]), &[vec![1.0, 2.0], vec![3.0]])
            .unwrap_err();
        assert_eq!(
            err,
            TrainingError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn value_count_must_match_shape() {
        assert!(FeatureMatrix::new(cols(&["a"]), vec![1.0, 2.0], 3).is_err());
    }
}
