//! Error types for meshtopo.
//!
//! Every fallible operation in the crate returns [`Result`]. Malformed faces
//! are tolerated locally where possible; the variants here cover the cases
//! that abort a whole operation.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// Topology construction produced too few edges to close any face.
    #[error("malformed topology: {faces} faces produced only {edges} edges")]
    MalformedTopology {
        /// Number of faces in the mesh.
        faces: usize,
        /// Number of unique edges found.
        edges: usize,
    },

    /// The radial edge sort could not place every edge of a vertex.
    #[error("radial sort of top vertex {vertex} placed {placed} of {expected} edges")]
    RadialSort {
        /// The top vertex index.
        vertex: usize,
        /// Number of edges placed before the walk stopped.
        placed: usize,
        /// Number of edges incident to the vertex.
        expected: usize,
    },

    /// A built partition failed its consistency check.
    #[error("invalid partition: {0}")]
    InvalidPartition(String),

    /// A per-vertex or per-face attribute array has the wrong length.
    #[error("attribute `{name}` has length {actual}, expected 0 or {expected}")]
    AttributeLength {
        /// Attribute name.
        name: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Invalid mesh state for the requested operation.
    #[error("invalid mesh state: {0}")]
    InvalidState(String),

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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_param_message() {
        let err = MeshError::invalid_param("max_vertices", 0, "must be at least 3");
        assert_eq!(
            err.to_string(),
            "invalid parameter: max_vertices = 0 (must be at least 3)"
        );
    }

    #[test]
    fn test_radial_sort_message() {
        let err = MeshError::RadialSort {
            vertex: 7,
            placed: 2,
            expected: 3,
        };
        assert!(err.to_string().contains("top vertex 7"));
    }
}
