//! Error types for blockmesh.
//!
//! Every modelling, constraint and tagging call validates its input before
//! touching any state, so an `Err` always leaves the model unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building, constraining, tagging or exporting
/// a block mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A curve loop does not close, a surface loop is not watertight, or an
    /// entity references points/edges in an impossible way.
    #[error("topology error: {0}")]
    Topology(String),

    /// An invalid transfinite subdivision count.
    #[error("edge {edge} subdivision count {count} is invalid (must be >= 2)")]
    Constraint {
        /// Tag of the edge.
        edge: usize,
        /// The rejected count.
        count: usize,
    },

    /// A face or volume was marked transfinite without satisfying the
    /// 4-edge / 6-face / opposite-pair-matching precondition.
    #[error("cannot structure {entity}: {reason}")]
    Structuring {
        /// Debug name of the face or volume.
        entity: String,
        /// Why the precondition failed.
        reason: String,
    },

    /// A physical group's dimension does not match one of its entities.
    #[error("physical group of dimension {expected} cannot contain {entity} (dimension {found})")]
    DimensionMismatch {
        /// Requested group dimension.
        expected: usize,
        /// Dimension of the offending entity.
        found: usize,
        /// Debug name of the offending entity.
        entity: String,
    },

    /// A physical tag is already used by another group of the same dimension.
    #[error("physical tag {tag} is already used at dimension {dim}")]
    TagConflict {
        /// Group dimension.
        dim: usize,
        /// The conflicting tag.
        tag: u32,
    },

    /// An id that does not exist in the geometry.
    #[error("unknown entity {0}")]
    UnknownEntity(String),

    /// A request the kernel deliberately does not handle.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a structuring error for the given entity.
    pub(crate) fn structuring<E: std::fmt::Debug>(entity: E, reason: impl Into<String>) -> Self {
        MeshError::Structuring {
            entity: format!("{:?}", entity),
            reason: reason.into(),
        }
    }

    /// Create an unknown-entity error.
    pub(crate) fn unknown<E: std::fmt::Debug>(entity: E) -> Self {
        MeshError::UnknownEntity(format!("{:?}", entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::Constraint { edge: 3, count: 1 };
        assert_eq!(
            format!("{err}"),
            "edge 3 subdivision count 1 is invalid (must be >= 2)"
        );

        let err = MeshError::TagConflict { dim: 2, tag: 7 };
        assert!(format!("{err}").contains("tag 7"));
    }
}
