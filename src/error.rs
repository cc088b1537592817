//! Error types for wrapmesh.
//!
//! This module defines all error types used throughout the library. Structural
//! input errors, precondition violations and out-of-range indices are all
//! reported through [`TopologyError`]. A search that finds no route is not an
//! error; see [`crate::algo::path::Path::is_complete`].

use thiserror::Error;

/// Result type alias using [`TopologyError`].
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Errors that can occur while building, validating or editing a topology.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// A face references a vertex index outside of the declared vertex count.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face declares fewer than two neighbors.
    #[error("face {face} is degenerate ({neighbor_count} neighbors)")]
    DegenerateFace {
        /// The face index.
        face: usize,
        /// The declared neighbor count.
        neighbor_count: usize,
    },

    /// A vertex is not referenced by any face.
    #[error("vertex {vertex} is not referenced by any face")]
    IsolatedVertex {
        /// The vertex index.
        vertex: usize,
    },

    /// Walking an external face boundary did not return to its start.
    #[error("external face ring starting at half-edge {edge} did not close within {limit} steps")]
    UnclosedExternalFace {
        /// The half-edge the walk started from.
        edge: usize,
        /// The step limit that was exceeded.
        limit: usize,
    },

    /// The number of external faces found differs from the declared count.
    #[error("expected {expected} external faces, found {found}")]
    ExternalFaceCountMismatch {
        /// The declared external face count.
        expected: usize,
        /// The number of external faces actually closed.
        found: usize,
    },

    /// The number of edges found differs from the declared count.
    #[error("expected {expected} edges, found {found}")]
    EdgeCountMismatch {
        /// The declared edge count.
        expected: usize,
        /// The number of edges actually created.
        found: usize,
    },

    /// A vertex ring does not close after exactly its neighbor count.
    #[error("vertex {vertex} ring is corrupt: expected {expected} neighbors, walked {walked}")]
    CorruptVertexRing {
        /// The vertex index.
        vertex: usize,
        /// The stored neighbor count.
        expected: usize,
        /// The number of steps walked before the ring closed or the walk gave up.
        walked: usize,
    },

    /// A face ring does not close after exactly its neighbor count.
    #[error("face {face} ring is corrupt: expected {expected} neighbors, walked {walked}")]
    CorruptFaceRing {
        /// The face index.
        face: usize,
        /// The stored neighbor count.
        expected: usize,
        /// The number of steps walked before the ring closed or the walk gave up.
        walked: usize,
    },

    /// A half-edge's twin relation is not an involution without fixed points.
    #[error("half-edge {edge} has an inconsistent twin")]
    BrokenTwin {
        /// The half-edge index.
        edge: usize,
    },

    /// Raw arrays handed to the topology do not agree with each other.
    #[error("raw topology arrays are inconsistent: {0}")]
    MismatchedRawParts(String),

    /// An edit was requested whose precondition does not hold.
    #[error("illegal {operation}: {reason}")]
    IllegalOperation {
        /// The operation name.
        operation: &'static str,
        /// Why the operation was rejected.
        reason: String,
    },

    /// The operation requires a topology without external faces.
    #[error("operation requires no external faces, found {count}")]
    ExternalFacesPresent {
        /// The number of external faces.
        count: usize,
    },

    /// An index argument is outside the valid range.
    #[error("{kind} index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// The element kind ("vertex", "half-edge", "face").
        kind: &'static str,
        /// The offending index.
        index: usize,
        /// The number of elements of that kind.
        len: usize,
    },
}

impl TopologyError {
    /// Create an illegal operation error.
    pub fn illegal<T: std::fmt::Display>(operation: &'static str, reason: T) -> Self {
        TopologyError::IllegalOperation {
            operation,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = TopologyError::IndexOutOfRange {
            kind: "vertex",
            index: 12,
            len: 9,
        };
        assert_eq!(err.to_string(), "vertex index 12 out of range (len 9)");

        let err = TopologyError::illegal("pivot", "face 3 would drop below 2 neighbors");
        assert_eq!(
            err.to_string(),
            "illegal pivot: face 3 would drop below 2 neighbors"
        );
    }
}
