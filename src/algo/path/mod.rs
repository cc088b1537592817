//! Shortest paths over the vertex graph or the face graph.
//!
//! [`PathFinder`] runs A* with a caller-supplied heuristic and edge cost.
//! The result is a [`Path`]: the half-edges crossed from source to target.
//!
//! A search that cannot reach its target is not an error. It returns a path
//! with no edges whose [`Path::is_complete`] is `false`.
//!
//! # Example
//!
//! ```
//! # use wrapmesh::prelude::*;
//! # struct Square;
//! # impl FaceNeighborIndexer for Square {
//! #     fn vertex_count(&self) -> usize { 4 }
//! #     fn edge_count(&self) -> usize { 5 }
//! #     fn internal_face_count(&self) -> usize { 2 }
//! #     fn external_face_count(&self) -> usize { 1 }
//! #     fn neighbor_count(&self, _face: usize) -> usize { 3 }
//! #     fn neighbor_vertex_index(&self, face: usize, neighbor: usize) -> usize {
//! #         [[0, 2, 1], [0, 3, 2]][face][neighbor]
//! #     }
//! # }
//! // Two triangles sharing the diagonal from 0 to 2
//! let topology: Topology = build_topology(&Square).unwrap();
//!
//! let mut finder = PathFinder::new();
//! let path = finder
//!     .find_vertex_path(
//!         &topology,
//!         VertexId::new(1),
//!         VertexId::new(3),
//!         |_vertex, _target, _length| 0.0,
//!         |_edge, _length| 1.0,
//!     )
//!     .unwrap();
//! assert!(path.is_complete());
//! assert_eq!(path.len(), 2);
//! assert_eq!(path.cost(), 2.0);
//! ```

mod astar;

pub use astar::PathFinder;

use crate::topology::{FaceId, HalfEdgeId, MeshIndex, Topology, VertexId};

/// Result of a path search.
///
/// `N` is the node type: [`VertexId`] for vertex paths, [`FaceId`] for face
/// paths.
#[derive(Debug, Clone, PartialEq)]
pub struct Path<N, I: MeshIndex = u32> {
    source: N,
    target: N,
    edges: Vec<HalfEdgeId<I>>,
    cost: f64,
}

impl<N: Copy + PartialEq, I: MeshIndex> Path<N, I> {
    pub(crate) fn new(source: N, target: N, edges: Vec<HalfEdgeId<I>>, cost: f64) -> Self {
        Self {
            source,
            target,
            edges,
            cost,
        }
    }

    pub(crate) fn unreachable(source: N, target: N) -> Self {
        Self::new(source, target, Vec::new(), f64::INFINITY)
    }

    /// The node the search started from.
    pub fn source(&self) -> N {
        self.source
    }

    /// The node the search was looking for.
    pub fn target(&self) -> N {
        self.target
    }

    /// Half-edges crossed in order. Each one leaves the previous node.
    pub fn edges(&self) -> &[HalfEdgeId<I>] {
        &self.edges
    }

    /// Number of edges crossed.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Check whether no edge is crossed.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Total cost, or infinity if the target was not reached.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Check whether the path actually connects source and target.
    ///
    /// True iff at least one edge is crossed or source equals target.
    pub fn is_complete(&self) -> bool {
        !self.edges.is_empty() || self.source == self.target
    }
}

impl<I: MeshIndex> Path<VertexId<I>, I> {
    /// The vertices visited, source and target included.
    ///
    /// Empty for an incomplete path.
    pub fn vertices(&self, topology: &Topology<I>) -> Vec<VertexId<I>> {
        if !self.is_complete() {
            return Vec::new();
        }
        std::iter::once(self.source)
            .chain(self.edges.iter().map(|&he| topology.far_vertex(he)))
            .collect()
    }
}

impl<I: MeshIndex> Path<FaceId<I>, I> {
    /// The faces visited, source and target included.
    ///
    /// Empty for an incomplete path.
    pub fn faces(&self, topology: &Topology<I>) -> Vec<FaceId<I>> {
        if !self.is_complete() {
            return Vec::new();
        }
        std::iter::once(self.source)
            .chain(self.edges.iter().map(|&he| topology.far_face(he)))
            .collect()
    }
}
