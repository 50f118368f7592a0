//! Pattern and activation tables
//!
//! This module provides the two tables the net exchanges data through:
//!
//! - [`PatternList`]: the external dataset — labeled rows of feature
//!   values, one row per training pattern. The net only ever asks it for
//!   its row count, its column width, and one row at a time.
//! - [`ActivationList`]: the output artifact of running patterns through
//!   the net — one row of final-layer output activations per pattern.
//!
//! Both are plain value types backed by a [`Matrix`] and persist as JSON,
//! so they round-trip through files without any bespoke format.
//!
//! ## Example
//!
//! ```rust
//! # use harmonium::pattern::PatternList;
//! let patterns = PatternList::from_rows(vec![
//!     vec![1.0, 0.0, 1.0, 0.0],
//!     vec![0.0, 1.0, 0.0, 1.0],
//! ]).unwrap();
//!
//! assert_eq!(patterns.len(), 2);
//! assert_eq!(patterns.width(), 4);
//! assert_eq!(patterns.row(1), &[0.0, 1.0, 0.0, 1.0]);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NetError, NetResult};
use crate::matrix::Matrix;

/// An external dataset of labeled feature rows.
///
/// Every row has the same width; construction rejects ragged input. Row
/// labels are optional and carried only for the caller's bookkeeping —
/// the net never reads them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternList {
    labels: Vec<String>,
    data: Matrix,
}

impl PatternList {
    /// Build a pattern list from unlabeled rows.
    ///
    /// Labels default to `"pattern 1"`, `"pattern 2"`, ...
    ///
    /// # Errors
    ///
    /// Returns [`NetError::ShapeMismatch`] if the rows differ in width.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> NetResult<Self> {
        let labels = (1..=rows.len()).map(|i| format!("pattern {i}")).collect();
        Self::from_labeled_rows(labels, rows)
    }

    /// Build a pattern list from labeled rows.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::ShapeMismatch`] if the rows differ in width or
    /// if the label count differs from the row count.
    pub fn from_labeled_rows(labels: Vec<String>, rows: Vec<Vec<f64>>) -> NetResult<Self> {
        if labels.len() != rows.len() {
            return Err(NetError::ShapeMismatch {
                context: "pattern labels".to_string(),
                actual: labels.len(),
                expected: rows.len(),
            });
        }
        let data = Matrix::from_rows(&rows)?;
        Ok(Self { labels, data })
    }

    /// Number of pattern rows.
    pub fn len(&self) -> usize {
        self.data.rows()
    }

    /// True if the list has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of every row (number of features).
    pub fn width(&self) -> usize {
        self.data.cols()
    }

    /// One pattern row, zero-based.
    pub fn row(&self, index: usize) -> &[f64] {
        self.data.row(index)
    }

    /// The label of one pattern row, zero-based.
    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }

    /// Save the pattern list as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> NetResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a pattern list previously written by [`PatternList::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> NetResult<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Final-layer output activations collected over a pattern list.
///
/// Rows correspond one-to-one to the pattern rows that produced them;
/// columns correspond to the last layer's output nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivationList {
    data: Matrix,
}

impl ActivationList {
    pub(crate) fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: Matrix::zeros(rows, cols),
        }
    }

    pub(crate) fn set_row(&mut self, index: usize, values: &[f64]) {
        self.data.row_mut(index).copy_from_slice(values);
    }

    /// Number of activation rows (one per pattern).
    pub fn len(&self) -> usize {
        self.data.rows()
    }

    /// True if the list has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of output nodes per row.
    pub fn width(&self) -> usize {
        self.data.cols()
    }

    /// One activation row, zero-based.
    pub fn row(&self, index: usize) -> &[f64] {
        self.data.row(index)
    }

    /// The underlying matrix (rows = patterns, columns = output nodes).
    pub fn as_matrix(&self) -> &Matrix {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_assigns_default_labels() {
        let patterns =
            PatternList::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(patterns.label(0), "pattern 1");
        assert_eq!(patterns.label(1), "pattern 2");
    }

    #[test]
    fn test_from_rows_rejects_ragged_widths() {
        let result = PatternList::from_rows(vec![vec![1.0, 0.0], vec![0.0]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_labeled_rows_rejects_label_count_mismatch() {
        let result = PatternList::from_labeled_rows(
            vec!["only one".to_string()],
            vec![vec![1.0], vec![0.0]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_row_access() {
        let patterns =
            PatternList::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
                .unwrap();
        assert_eq!(patterns.width(), 3);
        assert_eq!(patterns.row(0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patterns.json");

        let patterns = PatternList::from_labeled_rows(
            vec!["on".to_string(), "off".to_string()],
            vec![vec![1.0, 1.0], vec![0.0, 0.0]],
        )
        .unwrap();
        patterns.save(&path).unwrap();

        let reloaded = PatternList::load(&path).unwrap();
        assert_eq!(reloaded, patterns);
    }

    #[test]
    fn test_activation_list_rows() {
        let mut activations = ActivationList::zeros(2, 3);
        activations.set_row(1, &[0.1, 0.2, 0.3]);
        assert_eq!(activations.len(), 2);
        assert_eq!(activations.width(), 3);
        assert_eq!(activations.row(0), &[0.0, 0.0, 0.0]);
        assert_eq!(activations.row(1), &[0.1, 0.2, 0.3]);
    }
}
