//! # Wrapmesh
//!
//! A half-edge topology engine with first-class support for wraparound
//! (periodic) worlds.
//!
//! Wrapmesh keeps connectivity and geometry apart. A [`Topology`](topology::Topology)
//! stores only who-is-next-to-whom, and every half-edge carries a compact
//! wrap annotation describing how neighboring elements are offset when the
//! surface closes on itself, as on a torus-shaped game map or a cylinder.
//!
//! ## Features
//!
//! - **Half-edge topology**: O(1) adjacency with typed `u16`/`u32`/`u64` indices
//! - **Wrap algebra**: bit-packed periodic offsets between vertices, edges and faces
//! - **Builder**: topology from any face-neighbor description, open or closed
//! - **Editor**: local pivot and spin operations that keep wraps consistent
//! - **Path finding**: reusable A* over the vertex graph or the face graph
//! - **Face location**: BSP point and ray queries that resolve wraparound
//!
//! ## Quick Start
//!
//! ```
//! use wrapmesh::prelude::*;
//!
//! /// Two triangles sharing the diagonal of a square.
//! struct Square;
//!
//! impl FaceNeighborIndexer for Square {
//!     fn vertex_count(&self) -> usize { 4 }
//!     fn edge_count(&self) -> usize { 5 }
//!     fn internal_face_count(&self) -> usize { 2 }
//!     fn external_face_count(&self) -> usize { 1 }
//!     fn neighbor_count(&self, _face: usize) -> usize { 3 }
//!     fn neighbor_vertex_index(&self, face: usize, neighbor: usize) -> usize {
//!         [[0, 2, 1], [0, 3, 2]][face][neighbor]
//!     }
//! }
//!
//! let mut topology: Topology = build_topology(&Square).unwrap();
//! assert_eq!(topology.num_vertices(), 4);
//! assert_eq!(topology.num_internal_faces(), 2);
//!
//! // Walk around a vertex
//! let v = topology.vertex(VertexId::new(0));
//! for edge in v.edges() {
//!     println!("{:?} -> {:?}", edge.vertex(), edge.far_vertex());
//! }
//!
//! // Flip the shared diagonal
//! let diagonal = topology
//!     .half_edges()
//!     .find(|he| he.near_face().is_internal() && he.far_face().is_internal())
//!     .map(|he| he.id())
//!     .unwrap();
//! topology.spin_forward(diagonal).unwrap();
//! assert!(topology.is_valid());
//! ```
//!
//! ## Modules
//!
//! - [`topology`]: the core structure, builder, editor and attributes
//! - [`algo::path`]: A* path finding
//! - [`algo::locate`]: point-to-face location

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod topology;

pub use error::{Result, TopologyError};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use wrapmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::locate::{FaceLocator, LocatorOptions, PlanarSurface, Ray, Surface};
    pub use crate::algo::path::{Path, PathFinder};
    pub use crate::error::{Result, TopologyError};
    pub use crate::topology::{
        build_topology, build_topology_with, BuildOptions, EdgeWrap, Face, FaceEdge, FaceId,
        FaceNeighborIndexer, HalfEdge, HalfEdgeId, MeshIndex, Topology, Vertex, VertexEdge,
        VertexId, WrapOffset, WrapRelation,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
