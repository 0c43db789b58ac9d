//! Error type shared by the upscaling layers.

use thiserror::Error;

use crate::types::Side3D;

/// Errors raised while building or querying the vertical-equilibrium upscaling.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VertEqError {
    /// A fine cell has no face carrying the requested side tag.
    #[error("cell {cell} has no {side} face")]
    MissingFace {
        /// Fine-grid cell index
        cell: usize,
        /// Side that was searched for
        side: Side3D,
    },

    /// A column without positive extent, which cannot be averaged over.
    #[error(
        "column {column} is degenerate (height {total_height}, volume {total_volume})"
    )]
    DegenerateColumn {
        /// Coarse column index
        column: usize,
        /// Sum of block heights in the column
        total_height: f64,
        /// Sum of fine-cell volumes in the column
        total_volume: f64,
    },

    /// Capability with no upscaling model.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// Input array of the wrong length.
    #[error("size mismatch for {what}: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Name of the offending array
        what: &'static str,
        /// Required length
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// Run-length offset table is not a valid partition.
    #[error("invalid run-length offsets: {0}")]
    InvalidOffsets(String),

    /// Grid input that cannot describe a valid grid.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
}

/// Result alias for upscaling operations.
pub type Result<T> = std::result::Result<T, VertEqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_face_message() {
        let err = VertEqError::MissingFace {
            cell: 7,
            side: Side3D::Down,
        };
        assert_eq!(err.to_string(), "cell 7 has no down face");
    }

    #[test]
    fn test_not_implemented_is_distinct() {
        let err = VertEqError::NotImplemented("relative permeability");
        assert!(matches!(err, VertEqError::NotImplemented(_)));
        assert!(err.to_string().contains("relative permeability"));
    }
}
