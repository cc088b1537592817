//! Lightweight cursors over a [`Topology`].
//!
//! A cursor is a borrowed topology plus one index. Cursors never own
//! anything; copying them is free and converting between the three views of a
//! half-edge ([`HalfEdge`], [`VertexEdge`], [`FaceEdge`]) only changes how the
//! same index is interpreted.
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
//! let vertex = topology.vertex(VertexId::new(0));
//! let mut around: Vec<usize> = vertex
//!     .edges()
//!     .map(|edge| edge.far_vertex().id().index())
//!     .collect();
//! around.sort_unstable();
//! assert_eq!(around, [1, 2, 3]);
//!
//! let face = topology.face(FaceId::new(0));
//! assert!(face.is_internal());
//! assert_eq!(face.edges().count(), 3);
//! ```

use std::fmt;
use std::ptr;

use crate::error::Result;

use super::halfedge::Topology;
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use super::wrap::EdgeWrap;

macro_rules! impl_cursor {
    ($name:ident, $id:ident, $label:literal) => {
        impl<'a, I: MeshIndex> $name<'a, I> {
            /// The topology this cursor points into.
            #[inline]
            pub fn topology(&self) -> &'a Topology<I> {
                self.topology
            }

            /// The typed index.
            #[inline]
            pub fn id(&self) -> $id<I> {
                self.id
            }

            /// The raw index.
            #[inline]
            pub fn index(&self) -> usize {
                self.id.index()
            }
        }

        impl<'a, I: MeshIndex> Clone for $name<'a, I> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<'a, I: MeshIndex> Copy for $name<'a, I> {}

        impl<'a, I: MeshIndex> PartialEq for $name<'a, I> {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id && ptr::eq(self.topology, other.topology)
            }
        }

        impl<'a, I: MeshIndex> Eq for $name<'a, I> {}

        impl<'a, I: MeshIndex> fmt::Debug for $name<'a, I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $label, self.index())
            }
        }
    };
}

/// A vertex of a topology.
pub struct Vertex<'a, I: MeshIndex = u32> {
    topology: &'a Topology<I>,
    id: VertexId<I>,
}

/// A face of a topology, internal or external.
pub struct Face<'a, I: MeshIndex = u32> {
    topology: &'a Topology<I>,
    id: FaceId<I>,
}

/// A half-edge seen neutrally.
pub struct HalfEdge<'a, I: MeshIndex = u32> {
    topology: &'a Topology<I>,
    id: HalfEdgeId<I>,
}

/// A half-edge seen from its near vertex, as one step around that vertex.
pub struct VertexEdge<'a, I: MeshIndex = u32> {
    topology: &'a Topology<I>,
    id: HalfEdgeId<I>,
}

/// A half-edge seen from its near face, as one side of that face.
pub struct FaceEdge<'a, I: MeshIndex = u32> {
    topology: &'a Topology<I>,
    id: HalfEdgeId<I>,
}

impl_cursor!(Vertex, VertexId, "Vertex");
impl_cursor!(Face, FaceId, "Face");
impl_cursor!(HalfEdge, HalfEdgeId, "HalfEdge");
impl_cursor!(VertexEdge, HalfEdgeId, "VertexEdge");
impl_cursor!(FaceEdge, HalfEdgeId, "FaceEdge");

// ==================== Topology entry points ====================

impl<I: MeshIndex> Topology<I> {
    /// Get a vertex cursor.
    ///
    /// # Panics
    ///
    /// Navigating from the cursor panics if the index is out of range.
    /// Use [`Topology::try_vertex`] for untrusted indices.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> Vertex<'_, I> {
        Vertex { topology: self, id }
    }

    /// Get a face cursor. See [`Topology::vertex`] for panics.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> Face<'_, I> {
        Face { topology: self, id }
    }

    /// Get a neutral half-edge cursor. See [`Topology::vertex`] for panics.
    #[inline]
    pub fn half_edge(&self, id: HalfEdgeId<I>) -> HalfEdge<'_, I> {
        HalfEdge { topology: self, id }
    }

    /// Get a half-edge cursor relative to its near vertex.
    #[inline]
    pub fn vertex_edge(&self, id: HalfEdgeId<I>) -> VertexEdge<'_, I> {
        VertexEdge { topology: self, id }
    }

    /// Get a half-edge cursor relative to its near face.
    #[inline]
    pub fn face_edge(&self, id: HalfEdgeId<I>) -> FaceEdge<'_, I> {
        FaceEdge { topology: self, id }
    }

    /// Get a vertex cursor, checking the index.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IndexOutOfRange`](crate::TopologyError::IndexOutOfRange)
    /// if the index is out of range.
    pub fn try_vertex(&self, id: VertexId<I>) -> Result<Vertex<'_, I>> {
        self.check_vertex(id)?;
        Ok(self.vertex(id))
    }

    /// Get a face cursor, checking the index.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IndexOutOfRange`](crate::TopologyError::IndexOutOfRange)
    /// if the index is out of range.
    pub fn try_face(&self, id: FaceId<I>) -> Result<Face<'_, I>> {
        self.check_face(id)?;
        Ok(self.face(id))
    }

    /// Get a half-edge cursor, checking the index.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IndexOutOfRange`](crate::TopologyError::IndexOutOfRange)
    /// if the index is out of range.
    pub fn try_half_edge(&self, id: HalfEdgeId<I>) -> Result<HalfEdge<'_, I>> {
        self.check_halfedge(id)?;
        Ok(self.half_edge(id))
    }

    /// Iterate over all vertices.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = Vertex<'_, I>> + '_ {
        (0..self.num_vertices()).map(move |i| self.vertex(VertexId::new(i)))
    }

    /// Iterate over all faces, internal faces first.
    pub fn faces(&self) -> impl ExactSizeIterator<Item = Face<'_, I>> + '_ {
        (0..self.num_faces()).map(move |i| self.face(FaceId::new(i)))
    }

    /// Iterate over the internal faces.
    pub fn internal_faces(&self) -> impl ExactSizeIterator<Item = Face<'_, I>> + '_ {
        (0..self.num_internal_faces()).map(move |i| self.face(FaceId::new(i)))
    }

    /// Iterate over the external faces.
    pub fn external_faces(&self) -> impl ExactSizeIterator<Item = Face<'_, I>> + '_ {
        (self.num_internal_faces()..self.num_faces()).map(move |i| self.face(FaceId::new(i)))
    }

    /// Iterate over all half-edges.
    pub fn half_edges(&self) -> impl ExactSizeIterator<Item = HalfEdge<'_, I>> + '_ {
        (0..self.num_halfedges()).map(move |i| self.half_edge(HalfEdgeId::new(i)))
    }
}

// ==================== Vertex ====================

impl<'a, I: MeshIndex> Vertex<'a, I> {
    /// Number of half-edges leaving this vertex.
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.topology.vertex_neighbor_count(self.id)
    }

    /// The stored first edge of the ring.
    #[inline]
    pub fn first_edge(&self) -> VertexEdge<'a, I> {
        self.topology.vertex_edge(self.topology.vertex_first_edge(self.id))
    }

    /// Iterate clockwise over the half-edges leaving this vertex.
    pub fn edges(&self) -> VertexEdges<'a, I> {
        VertexEdges {
            topology: self.topology,
            current: self.topology.vertex_first_edge(self.id),
            remaining: self.neighbor_count(),
        }
    }

    /// Iterate over the vertices sharing an edge with this one.
    pub fn neighbors(&self) -> impl Iterator<Item = Vertex<'a, I>> {
        self.edges().map(|edge| edge.far_vertex())
    }

    /// Iterate over the faces around this vertex, external faces included.
    pub fn faces(&self) -> impl Iterator<Item = Face<'a, I>> {
        self.edges().map(|edge| edge.next_face())
    }

    /// Iterate over the edges of the surrounding faces that do not touch this
    /// vertex.
    ///
    /// Together they form the ring bounding the union of the vertex's faces.
    pub fn outer_face_edges(&self) -> OuterFaceEdges<'a, I> {
        let start = self.topology.vertex_first_edge(self.id);
        OuterFaceEdges {
            topology: self.topology,
            start,
            ring: start,
            current: self.topology.f_next(start),
            done: false,
        }
    }

    /// Check whether any surrounding face is external.
    pub fn is_boundary(&self) -> bool {
        self.faces().any(|face| face.is_external())
    }
}

// ==================== Face ====================

impl<'a, I: MeshIndex> Face<'a, I> {
    /// Check whether this is an internal face.
    #[inline]
    pub fn is_internal(&self) -> bool {
        self.topology.is_internal_face(self.id)
    }

    /// Check whether this face stands for the unbounded exterior.
    #[inline]
    pub fn is_external(&self) -> bool {
        !self.is_internal()
    }

    /// Number of sides of this face.
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.topology.face_neighbor_count(self.id)
    }

    /// The stored first edge of the ring.
    #[inline]
    pub fn first_edge(&self) -> FaceEdge<'a, I> {
        self.topology.face_edge(self.topology.face_first_edge(self.id))
    }

    /// Iterate clockwise over the sides of this face.
    pub fn edges(&self) -> FaceEdges<'a, I> {
        FaceEdges {
            topology: self.topology,
            current: self.topology.face_first_edge(self.id),
            remaining: self.neighbor_count(),
        }
    }

    /// Iterate over the faces across each side.
    pub fn neighbors(&self) -> impl Iterator<Item = Face<'a, I>> {
        self.edges().map(|edge| edge.far_face())
    }

    /// Iterate over the corners, in the order the face was described.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex<'a, I>> {
        self.edges().map(|edge| edge.next_vertex())
    }

    /// Iterate over the edges leaving the corners of this face that are not
    /// sides of it.
    ///
    /// Their far vertices are the vertices sharing only a corner with the face.
    pub fn outer_vertex_edges(&self) -> OuterVertexEdges<'a, I> {
        let start = self.topology.face_first_edge(self.id);
        OuterVertexEdges {
            topology: self.topology,
            start,
            ring: start,
            current: self.topology.v_next(self.topology.twin(start)),
            done: false,
        }
    }
}

// ==================== HalfEdge ====================

impl<'a, I: MeshIndex> HalfEdge<'a, I> {
    /// The opposing half-edge.
    #[inline]
    pub fn twin(&self) -> HalfEdge<'a, I> {
        self.topology.half_edge(self.topology.twin(self.id))
    }

    /// Next half-edge clockwise around the near vertex.
    #[inline]
    pub fn next_around_vertex(&self) -> HalfEdge<'a, I> {
        self.topology.half_edge(self.topology.v_next(self.id))
    }

    /// Previous half-edge around the near vertex.
    #[inline]
    pub fn prev_around_vertex(&self) -> HalfEdge<'a, I> {
        self.topology.half_edge(self.topology.v_prev(self.id))
    }

    /// Next half-edge clockwise around the near face.
    #[inline]
    pub fn next_around_face(&self) -> HalfEdge<'a, I> {
        self.topology.half_edge(self.topology.f_next(self.id))
    }

    /// Previous half-edge around the near face.
    #[inline]
    pub fn prev_around_face(&self) -> HalfEdge<'a, I> {
        self.topology.half_edge(self.topology.f_prev(self.id))
    }

    /// The vertex this half-edge leaves.
    #[inline]
    pub fn near_vertex(&self) -> Vertex<'a, I> {
        self.topology.vertex(self.topology.near_vertex(self.id))
    }

    /// The vertex this half-edge points at.
    #[inline]
    pub fn far_vertex(&self) -> Vertex<'a, I> {
        self.topology.vertex(self.topology.far_vertex(self.id))
    }

    /// The face whose ring contains this half-edge.
    #[inline]
    pub fn near_face(&self) -> Face<'a, I> {
        self.topology.face(self.topology.near_face(self.id))
    }

    /// The face on the other side.
    #[inline]
    pub fn far_face(&self) -> Face<'a, I> {
        self.topology.face(self.topology.far_face(self.id))
    }

    /// Periodic-boundary flags.
    #[inline]
    pub fn wrap(&self) -> EdgeWrap {
        self.topology.edge_wrap(self.id)
    }

    /// Check whether either side is an external face.
    pub fn is_boundary(&self) -> bool {
        self.near_face().is_external() || self.far_face().is_external()
    }

    /// Check whether any relation of this half-edge crosses a periodic boundary.
    pub fn is_wrapped(&self) -> bool {
        !self.wrap().is_none()
    }

    /// View from the near vertex.
    #[inline]
    pub fn as_vertex_edge(&self) -> VertexEdge<'a, I> {
        self.topology.vertex_edge(self.id)
    }

    /// View from the near face.
    #[inline]
    pub fn as_face_edge(&self) -> FaceEdge<'a, I> {
        self.topology.face_edge(self.id)
    }
}

// ==================== VertexEdge ====================

impl<'a, I: MeshIndex> VertexEdge<'a, I> {
    /// The vertex this edge belongs to (its near vertex).
    #[inline]
    pub fn vertex(&self) -> Vertex<'a, I> {
        self.topology.vertex(self.topology.near_vertex(self.id))
    }

    /// The neighboring vertex this edge points at.
    #[inline]
    pub fn far_vertex(&self) -> Vertex<'a, I> {
        self.topology.vertex(self.topology.far_vertex(self.id))
    }

    /// Next edge clockwise around the vertex.
    #[inline]
    pub fn next(&self) -> VertexEdge<'a, I> {
        self.topology.vertex_edge(self.topology.v_next(self.id))
    }

    /// Previous edge around the vertex.
    #[inline]
    pub fn prev(&self) -> VertexEdge<'a, I> {
        self.topology.vertex_edge(self.topology.v_prev(self.id))
    }

    /// The face between this edge and [`VertexEdge::next`].
    #[inline]
    pub fn next_face(&self) -> Face<'a, I> {
        self.topology.face(self.topology.near_face(self.id))
    }

    /// The face between [`VertexEdge::prev`] and this edge.
    #[inline]
    pub fn prev_face(&self) -> Face<'a, I> {
        self.topology.face(self.topology.far_face(self.id))
    }

    /// The same edge seen from the far vertex.
    #[inline]
    pub fn twin(&self) -> VertexEdge<'a, I> {
        self.topology.vertex_edge(self.topology.twin(self.id))
    }

    /// Periodic-boundary flags.
    #[inline]
    pub fn wrap(&self) -> EdgeWrap {
        self.topology.edge_wrap(self.id)
    }

    /// Neutral view.
    #[inline]
    pub fn as_half_edge(&self) -> HalfEdge<'a, I> {
        self.topology.half_edge(self.id)
    }

    /// View from the near face.
    #[inline]
    pub fn as_face_edge(&self) -> FaceEdge<'a, I> {
        self.topology.face_edge(self.id)
    }
}

// ==================== FaceEdge ====================

impl<'a, I: MeshIndex> FaceEdge<'a, I> {
    /// The face this edge belongs to (its near face).
    #[inline]
    pub fn face(&self) -> Face<'a, I> {
        self.topology.face(self.topology.near_face(self.id))
    }

    /// The neighboring face across this edge.
    #[inline]
    pub fn far_face(&self) -> Face<'a, I> {
        self.topology.face(self.topology.far_face(self.id))
    }

    /// Next side clockwise around the face.
    #[inline]
    pub fn next(&self) -> FaceEdge<'a, I> {
        self.topology.face_edge(self.topology.f_next(self.id))
    }

    /// Previous side around the face.
    #[inline]
    pub fn prev(&self) -> FaceEdge<'a, I> {
        self.topology.face_edge(self.topology.f_prev(self.id))
    }

    /// The corner shared with [`FaceEdge::prev`].
    #[inline]
    pub fn prev_vertex(&self) -> Vertex<'a, I> {
        self.topology.vertex(self.topology.near_vertex(self.id))
    }

    /// The corner shared with [`FaceEdge::next`].
    #[inline]
    pub fn next_vertex(&self) -> Vertex<'a, I> {
        self.topology.vertex(self.topology.far_vertex(self.id))
    }

    /// The same edge seen from the far face.
    #[inline]
    pub fn twin(&self) -> FaceEdge<'a, I> {
        self.topology.face_edge(self.topology.twin(self.id))
    }

    /// Periodic-boundary flags.
    #[inline]
    pub fn wrap(&self) -> EdgeWrap {
        self.topology.edge_wrap(self.id)
    }

    /// Neutral view.
    #[inline]
    pub fn as_half_edge(&self) -> HalfEdge<'a, I> {
        self.topology.half_edge(self.id)
    }

    /// View from the near vertex.
    #[inline]
    pub fn as_vertex_edge(&self) -> VertexEdge<'a, I> {
        self.topology.vertex_edge(self.id)
    }
}

// ==================== Iterators ====================

/// Iterator over the half-edges leaving a vertex.
pub struct VertexEdges<'a, I: MeshIndex = u32> {
    topology: &'a Topology<I>,
    current: HalfEdgeId<I>,
    remaining: usize,
}

impl<'a, I: MeshIndex> Iterator for VertexEdges<'a, I> {
    type Item = VertexEdge<'a, I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let result = self.topology.vertex_edge(self.current);
        self.current = self.topology.v_next(self.current);
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, I: MeshIndex> ExactSizeIterator for VertexEdges<'a, I> {}

/// Iterator over the sides of a face.
pub struct FaceEdges<'a, I: MeshIndex = u32> {
    topology: &'a Topology<I>,
    current: HalfEdgeId<I>,
    remaining: usize,
}

impl<'a, I: MeshIndex> Iterator for FaceEdges<'a, I> {
    type Item = FaceEdge<'a, I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let result = self.topology.face_edge(self.current);
        self.current = self.topology.f_next(self.current);
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, I: MeshIndex> ExactSizeIterator for FaceEdges<'a, I> {}

/// Iterator over the outer vertex edges of a face.
///
/// `ring` walks the face's own sides. At the far corner of each side, the
/// edges leaving that corner are visited from just past the side's twin up to
/// the next side of the face, which is where the walk jumps to the next
/// corner.
pub struct OuterVertexEdges<'a, I: MeshIndex = u32> {
    topology: &'a Topology<I>,
    start: HalfEdgeId<I>,
    ring: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> Iterator for OuterVertexEdges<'a, I> {
    type Item = VertexEdge<'a, I>;

    fn next(&mut self) -> Option<Self::Item> {
        let topology = self.topology;
        while !self.done {
            if self.current == topology.f_next(self.ring) {
                self.ring = self.current;
                if self.ring == self.start {
                    self.done = true;
                    break;
                }
                self.current = topology.v_next(topology.twin(self.ring));
            } else {
                let result = topology.vertex_edge(self.current);
                self.current = topology.v_next(self.current);
                return Some(result);
            }
        }
        None
    }
}

/// Iterator over the outer face edges of a vertex.
///
/// `ring` walks the vertex's own edges. Within the face following each of
/// them, the sides are visited from just past that edge up to the side that
/// returns to the vertex, which is where the walk jumps to the next face.
pub struct OuterFaceEdges<'a, I: MeshIndex = u32> {
    topology: &'a Topology<I>,
    start: HalfEdgeId<I>,
    ring: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> Iterator for OuterFaceEdges<'a, I> {
    type Item = FaceEdge<'a, I>;

    fn next(&mut self) -> Option<Self::Item> {
        let topology = self.topology;
        while !self.done {
            if topology.f_next(self.current) == self.ring {
                self.ring = topology.twin(self.current);
                if self.ring == self.start {
                    self.done = true;
                    break;
                }
                self.current = topology.f_next(self.ring);
            } else {
                let result = topology.face_edge(self.current);
                self.current = topology.f_next(self.current);
                return Some(result);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::build_topology;
    use crate::topology::testing::{quad_grid, wrapped_quad_grid};

    fn grid_vertex(width: usize, i: usize, j: usize) -> VertexId {
        VertexId::new(j * (width + 1) + i)
    }

    #[test]
    fn test_vertex_edges_are_clockwise_ring() {
        let topology: Topology = build_topology(&quad_grid(2, 2)).unwrap();
        let center = topology.vertex(grid_vertex(2, 1, 1));

        assert_eq!(center.neighbor_count(), 4);
        let edges: Vec<_> = center.edges().collect();
        assert_eq!(edges.len(), 4);
        for (k, edge) in edges.iter().enumerate() {
            assert_eq!(edge.vertex(), center);
            assert_eq!(edge.next(), edges[(k + 1) % 4]);
            assert_eq!(edge.next().prev(), *edge);
            // The face after an edge is the face before the next one.
            assert_eq!(edge.next_face(), edge.next().prev_face());
        }

        let mut neighbors: Vec<usize> = center.neighbors().map(|v| v.index()).collect();
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![1, 3, 5, 7]);

        let mut faces: Vec<usize> = center.faces().map(|f| f.index()).collect();
        faces.sort_unstable();
        assert_eq!(faces, vec![0, 1, 2, 3]);
        assert!(!center.is_boundary());
    }

    #[test]
    fn test_face_edges_follow_description() {
        let topology: Topology = build_topology(&quad_grid(2, 2)).unwrap();
        let face = topology.face(FaceId::new(0));

        assert!(face.is_internal());
        let vertices: Vec<usize> = face.vertices().map(|v| v.index()).collect();
        assert_eq!(vertices, vec![0, 3, 4, 1]);

        for edge in face.edges() {
            assert_eq!(edge.face(), face);
            assert_eq!(edge.next().prev_vertex(), edge.next_vertex());
            assert_eq!(edge.twin().far_face(), face);
        }
    }

    #[test]
    fn test_views_share_index() {
        let topology: Topology = build_topology(&quad_grid(1, 1)).unwrap();
        for he in topology.half_edges() {
            let vertex_edge = he.as_vertex_edge();
            let face_edge = he.as_face_edge();
            assert_eq!(vertex_edge.id(), he.id());
            assert_eq!(face_edge.as_half_edge(), he);
            assert_eq!(vertex_edge.vertex(), face_edge.prev_vertex());
            assert_eq!(vertex_edge.far_vertex(), face_edge.next_vertex());
            assert_eq!(vertex_edge.next_face(), face_edge.face());
            assert_eq!(vertex_edge.prev_face(), face_edge.far_face());
            assert_eq!(he.twin().twin(), he);
            assert_eq!(he.next_around_vertex().prev_around_vertex(), he);
            assert_eq!(he.next_around_face().prev_around_face(), he);
        }
    }

    #[test]
    fn test_boundary_queries() {
        let topology: Topology = build_topology(&quad_grid(2, 2)).unwrap();
        let corner = topology.vertex(grid_vertex(2, 0, 0));
        assert!(corner.is_boundary());
        assert_eq!(corner.neighbor_count(), 2);

        let external = topology.face(FaceId::new(4));
        assert!(external.is_external());
        assert_eq!(external.neighbor_count(), 8);
        assert!(external.edges().all(|e| e.as_half_edge().is_boundary()));
        assert_eq!(topology.external_faces().len(), 1);
        assert_eq!(topology.internal_faces().len(), 4);
    }

    #[test]
    fn test_outer_vertex_edges_of_interior_face() {
        // Each corner of the center face has two edges that are not its sides.
        let topology: Topology = build_topology(&quad_grid(3, 3)).unwrap();
        let face = topology.face(FaceId::new(4));

        let outer: Vec<_> = face.outer_vertex_edges().collect();
        assert_eq!(outer.len(), 8);

        let corners: Vec<_> = face.vertices().collect();
        for edge in &outer {
            assert!(corners.contains(&edge.vertex()));
            assert!(!corners.contains(&edge.far_vertex()));
        }
    }

    #[test]
    fn test_outer_vertex_edges_degenerate() {
        // Every corner of a lone quad has exactly the two sides of the face.
        let topology: Topology = build_topology(&quad_grid(1, 1)).unwrap();
        assert_eq!(topology.face(FaceId::new(0)).outer_vertex_edges().count(), 0);
    }

    #[test]
    fn test_outer_face_edges_of_interior_vertex() {
        let topology: Topology = build_topology(&quad_grid(2, 2)).unwrap();
        let center = topology.vertex(grid_vertex(2, 1, 1));

        let outer: Vec<_> = center.outer_face_edges().collect();
        // Four quads, two far sides each: the grid perimeter.
        assert_eq!(outer.len(), 8);
        for edge in &outer {
            assert!(edge.face().is_internal());
            assert_ne!(edge.prev_vertex(), center);
            assert_ne!(edge.next_vertex(), center);
            assert!(edge.far_face().is_external());
        }
    }

    #[test]
    fn test_outer_face_edges_on_torus() {
        let topology: Topology = build_topology(&wrapped_quad_grid(3, 3)).unwrap();
        for vertex in topology.vertices() {
            assert_eq!(vertex.outer_face_edges().count(), 8);
        }
        for face in topology.faces() {
            assert_eq!(face.outer_vertex_edges().count(), 8);
        }
    }

    #[test]
    fn test_checked_access() {
        let topology: Topology = build_topology(&quad_grid(1, 1)).unwrap();
        assert!(topology.try_vertex(VertexId::new(3)).is_ok());
        assert!(topology.try_vertex(VertexId::new(4)).is_err());
        assert!(topology.try_face(FaceId::new(2)).is_err());
        assert!(topology.try_half_edge(HalfEdgeId::new(7)).is_ok());
        assert!(topology.try_half_edge(HalfEdgeId::new(8)).is_err());
    }
}
