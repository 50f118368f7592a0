//! Dense matrices and order-stable summation
//!
//! This module provides the 2-D storage used for weight grids and for
//! detached snapshots of layer state, plus the summation routines every
//! excitation computation goes through.
//!
//! ## Storage
//!
//! - **Data**: flat `Vec<f64>` in row-major order
//! - **Shape**: `rows` × `cols`, fixed at construction
//!
//! ## Summation
//!
//! Excitations are inner products over a layer's full fan-in, which can be
//! large. Naive left-to-right accumulation loses low-order bits roughly in
//! proportion to the number of terms; [`pairwise_sum`] and [`pairwise_dot`]
//! instead split the term list in half recursively and add the two halves'
//! sums, so the error grows with the logarithm of the length. The recursion
//! is order-stable: the same inputs always produce the same result.

use serde::{Deserialize, Serialize};

use crate::error::{NetError, NetResult};

/// Below this length a sequential loop is faster than recursing further,
/// and short sums are accurate enough without the tree.
const PAIRWISE_BASE: usize = 8;

/// Order-stable pairwise summation.
///
/// Splits the slice in half recursively and sums each half, falling back
/// to a sequential loop for short slices.
///
/// # Example
///
/// ```rust
/// # use harmonium::matrix::pairwise_sum;
/// let terms = vec![1.0, 2.0, 3.0, 4.0];
/// assert_eq!(pairwise_sum(&terms), 10.0);
/// ```
pub fn pairwise_sum(terms: &[f64]) -> f64 {
    if terms.len() <= PAIRWISE_BASE {
        let mut sum = 0.0;
        for &term in terms {
            sum += term;
        }
        return sum;
    }
    let mid = terms.len() / 2;
    pairwise_sum(&terms[..mid]) + pairwise_sum(&terms[mid..])
}

/// Inner product of two equal-length slices using pairwise summation.
///
/// The products themselves are formed in order; only the additions are
/// arranged as a balanced tree.
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn pairwise_dot(xs: &[f64], ys: &[f64]) -> f64 {
    assert_eq!(
        xs.len(),
        ys.len(),
        "Dot product length mismatch: {} vs {}",
        xs.len(),
        ys.len()
    );
    if xs.len() <= PAIRWISE_BASE {
        let mut sum = 0.0;
        for (&x, &y) in xs.iter().zip(ys) {
            sum += x * y;
        }
        return sum;
    }
    let mid = xs.len() / 2;
    pairwise_dot(&xs[..mid], &ys[..mid]) + pairwise_dot(&xs[mid..], &ys[mid..])
}

/// A dense row-major matrix of `f64`.
///
/// Used for weight grids (rows = input nodes, columns = output nodes) and
/// for the detached snapshots returned by the extraction operations. A
/// `Matrix` never aliases live layer state: extraction always copies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix from flat row-major data.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "Data length ({}) doesn't match shape {}x{}",
            data.len(),
            rows,
            cols
        );
        Self { rows, cols, data }
    }

    /// Create a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::new(vec![0.0; rows * cols], rows, cols)
    }

    /// Create a single-row matrix by copying a slice.
    pub fn from_row(row: &[f64]) -> Self {
        Self::new(row.to_vec(), 1, row.len())
    }

    /// Build a matrix from a list of equally wide rows.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::ShapeMismatch`] naming the first row whose width
    /// differs from the first row's.
    pub fn from_rows(rows: &[Vec<f64>]) -> NetResult<Self> {
        let width = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * width);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(NetError::ShapeMismatch {
                    context: format!("row {} of matrix data", i + 1),
                    actual: row.len(),
                    expected: width,
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self::new(data, rows.len(), width))
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Element at `(row, col)`, zero-based.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Set the element at `(row, col)`, zero-based.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// One row as a contiguous slice.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Mutable access to one row.
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// One column, gathered into a fresh vector.
    ///
    /// Columns are strided in row-major storage, so callers that need a
    /// contiguous view (the pairwise dot over a weight column) gather here.
    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|row| self.get(row, col)).collect()
    }

    /// The full flat row-major data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairwise_sum_matches_naive_on_short_input() {
        let terms: Vec<f64> = (1..=6).map(|i| i as f64).collect();
        assert_eq!(pairwise_sum(&terms), 21.0);
    }

    #[test]
    fn test_pairwise_sum_matches_naive_on_long_input() {
        // Values chosen exactly representable so tree order can't matter.
        let terms: Vec<f64> = (0..1000).map(|i| i as f64).collect();
        let naive: f64 = terms.iter().sum();
        assert_eq!(pairwise_sum(&terms), naive);
    }

    #[test]
    fn test_pairwise_sum_is_repeatable() {
        let terms: Vec<f64> = (0..497).map(|i| 0.1 * i as f64).collect();
        assert_eq!(pairwise_sum(&terms), pairwise_sum(&terms));
    }

    #[test]
    fn test_pairwise_dot() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![4.0, 5.0, 6.0];
        assert_eq!(pairwise_dot(&xs, &ys), 32.0);
    }

    #[test]
    fn test_pairwise_dot_long() {
        let xs: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let ones = vec![1.0; 100];
        assert_eq!(pairwise_dot(&xs, &ones), pairwise_sum(&xs));
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn test_pairwise_dot_length_mismatch_panics() {
        pairwise_dot(&[1.0], &[1.0, 2.0]);
    }

    #[test]
    fn test_zeros_shape_and_contents() {
        let m = Matrix::zeros(3, 2);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 2);
        assert!(m.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_row_and_column_access() {
        let m = Matrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.column(2), vec![3.0, 6.0]);
        assert_eq!(m.get(0, 1), 2.0);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(Matrix::from_rows(&rows).is_err());
    }

    #[test]
    fn test_from_rows_builds_row_major() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let m = Matrix::from_rows(&rows).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }
}
