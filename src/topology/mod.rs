//! Half-edge topology with wrap annotations.
//!
//! This module provides the connectivity representation every algorithm in
//! the crate works on, together with the tools to build and edit it.
//!
//! # Overview
//!
//! The primary type is [`Topology`], a half-edge structure with no geometry.
//! Each half-edge knows its twin, the next half-edge around its near vertex
//! and the next half-edge around its near face. Faces are either internal
//! (described by the input) or external (synthesized to close each boundary).
//!
//! Every half-edge also carries an [`EdgeWrap`], which records how the frames
//! of adjacent elements are offset on a periodic surface such as a torus or a
//! cylinder. On a plain surface every wrap is [`EdgeWrap::NONE`].
//!
//! # Index Types
//!
//! Elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`]
//! trait), allowing you to choose `u16`, `u32`, or `u64`.
//!
//! # Construction
//!
//! Topologies are built from any [`FaceNeighborIndexer`]:
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
//! let topology: Topology = build_topology(&Square).unwrap();
//! for face in topology.internal_faces() {
//!     assert_eq!(face.neighbor_count(), 3);
//! }
//! ```
//!
//! # Editing
//!
//! [`Topology::pivot_forward`], [`Topology::pivot_backward`],
//! [`Topology::spin_forward`] and [`Topology::spin_backward`] change
//! connectivity locally while keeping every invariant and wrap consistent.

mod attribute;
mod builder;
mod cursor;
mod editor;
mod halfedge;
mod index;
mod wrap;

#[cfg(test)]
pub(crate) mod testing;

pub use attribute::{ArrayAttribute, ConstantAttribute, ElementAttribute, ElementKey, FnAttribute};
pub use builder::{build_topology, build_topology_with, BuildOptions, FaceNeighborIndexer, Validation};
pub use cursor::{
    Face, FaceEdge, FaceEdges, HalfEdge, OuterFaceEdges, OuterVertexEdges, Vertex, VertexEdge,
    VertexEdges,
};
pub use halfedge::{HalfEdgeData, Topology, TopologyParts};
pub use index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
pub use wrap::{EdgeWrap, WrapOffset, WrapRelation};
