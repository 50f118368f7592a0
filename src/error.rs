//! Error types for harmonium.

use thiserror::Error;

/// Top-level error type for net construction, pattern exchange, and
/// layer-indexed extraction.
///
/// Only two conditions arise from the algorithms themselves: a width
/// disagreement between an external table and a layer boundary, and a
/// layer number outside the net. Both always carry the offending and
/// expected values so the caller can report them without re-deriving
/// anything. IO and serialization failures from save/load are wrapped
/// rather than surfaced as foreign types.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("{context}: width {actual} does not match {expected} nodes")]
    ShapeMismatch {
        context: String,
        actual: usize,
        expected: usize,
    },

    #[error("layer number {requested} is out of range: should be between 1 and {max}")]
    LayerOutOfRange { requested: usize, max: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for NetError {
    fn from(err: serde_json::Error) -> Self {
        NetError::Serialization(err.to_string())
    }
}

/// Result type alias for net operations.
pub type NetResult<T> = Result<T, NetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_names_both_sizes() {
        let err = NetError::ShapeMismatch {
            context: "pattern row 3 applied to input".to_string(),
            actual: 5,
            expected: 4,
        };
        let message = err.to_string();
        assert!(message.contains('5'));
        assert!(message.contains('4'));
    }

    #[test]
    fn test_out_of_range_names_bound() {
        let err = NetError::LayerOutOfRange {
            requested: 7,
            max: 2,
        };
        let message = err.to_string();
        assert!(message.contains('7'));
        assert!(message.contains('2'));
    }
}
