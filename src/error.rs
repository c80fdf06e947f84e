//! Error types for the FEM engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of [`FemError`], for callers that only need to branch
/// on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Invalid mesh parameters, material constants or boundary conditions
    Configuration,
    /// Zero-length element, non-positive area or non-invertible Jacobian
    DegenerateGeometry,
    /// Zero pivot during elimination
    SingularSystem,
    /// DOF, node or element index outside the valid range
    OutOfRange,
    /// Reading or decoding an external document failed
    Io,
    /// A run stopped without producing a result
    Aborted,
}

/// Main error type for FEM operations
#[derive(Error, Debug)]
pub enum FemError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Element {element} has degenerate geometry: {reason}")]
    DegenerateGeometry { element: usize, reason: String },

    #[error("Singular stiffness matrix at pivot {pivot} - check supports and connectivity")]
    SingularSystem { pivot: usize },

    #[error("DOF {index} out of range (system has {len} DOFs)")]
    DofOutOfRange { index: usize, len: usize },

    #[error("Node {index} out of range (mesh has {len} nodes)")]
    NodeOutOfRange { index: usize, len: usize },

    #[error("Element {index} out of range (mesh has {len} elements)")]
    ElementOutOfRange { index: usize, len: usize },

    #[error("Analysis aborted: {0}")]
    Aborted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FemError {
    /// Shorthand for a [`FemError::Configuration`] error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Shorthand for a [`FemError::DegenerateGeometry`] error
    pub fn degenerate(element: usize, reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            element,
            reason: reason.into(),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::DegenerateGeometry { .. } => ErrorKind::DegenerateGeometry,
            Self::SingularSystem { .. } => ErrorKind::SingularSystem,
            Self::DofOutOfRange { .. }
            | Self::NodeOutOfRange { .. }
            | Self::ElementOutOfRange { .. } => ErrorKind::OutOfRange,
            Self::Io(_) | Self::Serialization(_) => ErrorKind::Io,
            Self::Aborted(_) => ErrorKind::Aborted,
        }
    }
}

/// Result type for FEM operations
pub type FemResult<T> = Result<T, FemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(FemError::config("bad").kind(), ErrorKind::Configuration);
        assert_eq!(
            FemError::degenerate(3, "zero length").kind(),
            ErrorKind::DegenerateGeometry
        );
        assert_eq!(
            FemError::SingularSystem { pivot: 0 }.kind(),
            ErrorKind::SingularSystem
        );
        assert_eq!(
            FemError::DofOutOfRange { index: 9, len: 4 }.kind(),
            ErrorKind::OutOfRange
        );
    }

    #[test]
    fn test_error_messages() {
        let err = FemError::degenerate(2, "zero length");
        assert_eq!(err.to_string(), "Element 2 has degenerate geometry: zero length");
    }
}
