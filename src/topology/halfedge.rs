//! Half-edge topology data structure.
//!
//! This module provides the array-backed half-edge representation at the
//! heart of the crate. It describes connectivity only; positions and every
//! other per-element attribute live outside of it.
//!
//! # Structure
//!
//! - Each undirected edge is split into two **half-edges** that are each
//!   other's **twin**.
//! - A half-edge stores its **far vertex** and **far face**. Its near vertex
//!   and near face are the far vertex and far face of its twin.
//! - `v_next` links the half-edges leaving a vertex into a clockwise ring;
//!   `f_next` links the half-edges of a face boundary into a clockwise ring.
//!   The two are tied together by `v_next(e) == twin(f_prev(e))`.
//! - Every vertex and face stores its neighbor count and one half-edge of its
//!   ring.
//!
//! # Boundary Handling
//!
//! There is no "no face" value. A topology that does not wrap all the way
//! around has one or more **external** faces standing for the unbounded
//! outside. External faces occupy the indices at and after
//! [`Topology::first_external_face_index`].

use crate::error::{Result, TopologyError};

use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use super::wrap::EdgeWrap;

/// The record stored for each half-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdgeData<I: MeshIndex = u32> {
    /// The opposing half-edge.
    pub twin: HalfEdgeId<I>,

    /// Next half-edge clockwise around the near vertex.
    pub v_next: HalfEdgeId<I>,

    /// Next half-edge clockwise around the near face.
    pub f_next: HalfEdgeId<I>,

    /// The far vertex.
    pub vertex: VertexId<I>,

    /// The far face.
    pub face: FaceId<I>,

    /// Periodic-boundary flags for the relations of this half-edge.
    pub wrap: EdgeWrap,
}

/// Raw arrays of a [`Topology`], as produced by [`Topology::into_raw_parts`].
///
/// This is the persistence contract: any serializer that round-trips these
/// fields exactly round-trips the topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyParts<I: MeshIndex = u32> {
    /// Neighbor count of every vertex.
    pub vertex_neighbor_counts: Vec<usize>,
    /// One half-edge of every vertex ring.
    pub vertex_first_edges: Vec<HalfEdgeId<I>>,
    /// All half-edge records.
    pub half_edges: Vec<HalfEdgeData<I>>,
    /// Neighbor count of every face, internal faces first.
    pub face_neighbor_counts: Vec<usize>,
    /// One half-edge of every face ring.
    pub face_first_edges: Vec<HalfEdgeId<I>>,
    /// Index of the first external face.
    pub first_external_face_index: usize,
}

/// A half-edge topology of vertices, half-edges and faces.
///
/// The topology is the single owner of all connectivity arrays. Cursor types
/// ([`Vertex`](super::Vertex), [`Face`](super::Face), ...) borrow it and only
/// carry an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology<I: MeshIndex = u32> {
    pub(crate) vertex_neighbor_counts: Vec<usize>,
    pub(crate) vertex_first_edges: Vec<HalfEdgeId<I>>,
    pub(crate) half_edges: Vec<HalfEdgeData<I>>,
    pub(crate) face_neighbor_counts: Vec<usize>,
    pub(crate) face_first_edges: Vec<HalfEdgeId<I>>,
    pub(crate) first_external_face_index: usize,
}

impl<I: MeshIndex> Topology<I> {
    /// Assemble a topology from raw arrays, validating every invariant.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MismatchedRawParts`] if array lengths disagree,
    /// [`TopologyError::IndexOutOfRange`] for dangling indices, and any ring
    /// or twin error reported by [`Topology::validate`].
    pub fn from_raw_parts(parts: TopologyParts<I>) -> Result<Self> {
        if parts.vertex_neighbor_counts.len() != parts.vertex_first_edges.len() {
            return Err(TopologyError::MismatchedRawParts(format!(
                "{} vertex neighbor counts but {} vertex first edges",
                parts.vertex_neighbor_counts.len(),
                parts.vertex_first_edges.len()
            )));
        }
        if parts.face_neighbor_counts.len() != parts.face_first_edges.len() {
            return Err(TopologyError::MismatchedRawParts(format!(
                "{} face neighbor counts but {} face first edges",
                parts.face_neighbor_counts.len(),
                parts.face_first_edges.len()
            )));
        }
        if parts.first_external_face_index > parts.face_neighbor_counts.len() {
            return Err(TopologyError::MismatchedRawParts(format!(
                "first external face index {} exceeds face count {}",
                parts.first_external_face_index,
                parts.face_neighbor_counts.len()
            )));
        }
        if parts.half_edges.len() % 2 != 0 {
            return Err(TopologyError::MismatchedRawParts(format!(
                "odd half-edge count {}",
                parts.half_edges.len()
            )));
        }

        let topology = Self {
            vertex_neighbor_counts: parts.vertex_neighbor_counts,
            vertex_first_edges: parts.vertex_first_edges,
            half_edges: parts.half_edges,
            face_neighbor_counts: parts.face_neighbor_counts,
            face_first_edges: parts.face_first_edges,
            first_external_face_index: parts.first_external_face_index,
        };
        topology.check_references()?;
        topology.validate()?;
        Ok(topology)
    }

    /// Split the topology into its raw arrays.
    pub fn into_raw_parts(self) -> TopologyParts<I> {
        TopologyParts {
            vertex_neighbor_counts: self.vertex_neighbor_counts,
            vertex_first_edges: self.vertex_first_edges,
            half_edges: self.half_edges,
            face_neighbor_counts: self.face_neighbor_counts,
            face_first_edges: self.face_first_edges,
            first_external_face_index: self.first_external_face_index,
        }
    }

    // ==================== Counts ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertex_neighbor_counts.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.half_edges.len()
    }

    /// Get the number of undirected edges (half the half-edge count).
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.half_edges.len() / 2
    }

    /// Get the number of faces, internal and external.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.face_neighbor_counts.len()
    }

    /// Get the number of internal faces.
    #[inline]
    pub fn num_internal_faces(&self) -> usize {
        self.first_external_face_index
    }

    /// Get the number of external faces.
    #[inline]
    pub fn num_external_faces(&self) -> usize {
        self.face_neighbor_counts.len() - self.first_external_face_index
    }

    /// Index of the first external face. Faces below it are internal.
    #[inline]
    pub fn first_external_face_index(&self) -> usize {
        self.first_external_face_index
    }

    // ==================== Raw arrays ====================

    /// Neighbor count of every vertex.
    #[inline]
    pub fn vertex_neighbor_counts(&self) -> &[usize] {
        &self.vertex_neighbor_counts
    }

    /// First half-edge of every vertex ring.
    #[inline]
    pub fn vertex_first_edges(&self) -> &[HalfEdgeId<I>] {
        &self.vertex_first_edges
    }

    /// All half-edge records.
    #[inline]
    pub fn half_edge_data(&self) -> &[HalfEdgeData<I>] {
        &self.half_edges
    }

    /// Neighbor count of every face.
    #[inline]
    pub fn face_neighbor_counts(&self) -> &[usize] {
        &self.face_neighbor_counts
    }

    /// First half-edge of every face ring.
    #[inline]
    pub fn face_first_edges(&self) -> &[HalfEdgeId<I>] {
        &self.face_first_edges
    }

    // ==================== Raw navigation ====================

    #[inline]
    pub(crate) fn data(&self, he: HalfEdgeId<I>) -> &HalfEdgeData<I> {
        &self.half_edges[he.index()]
    }

    #[inline]
    pub(crate) fn data_mut(&mut self, he: HalfEdgeId<I>) -> &mut HalfEdgeData<I> {
        &mut self.half_edges[he.index()]
    }

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.data(he).twin
    }

    /// Next half-edge clockwise around the near vertex.
    #[inline]
    pub fn v_next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.data(he).v_next
    }

    /// Previous half-edge around the near vertex.
    #[inline]
    pub fn v_prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.f_next(self.twin(he))
    }

    /// Next half-edge clockwise around the near face.
    #[inline]
    pub fn f_next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.data(he).f_next
    }

    /// Previous half-edge around the near face.
    #[inline]
    pub fn f_prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.twin(self.v_next(he))
    }

    /// The vertex a half-edge points at.
    #[inline]
    pub fn far_vertex(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.data(he).vertex
    }

    /// The vertex a half-edge leaves from.
    #[inline]
    pub fn near_vertex(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.far_vertex(self.twin(he))
    }

    /// The face on the far side of a half-edge.
    #[inline]
    pub fn far_face(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.data(he).face
    }

    /// The face whose boundary ring contains the half-edge.
    #[inline]
    pub fn near_face(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.far_face(self.twin(he))
    }

    /// Periodic-boundary flags of a half-edge.
    #[inline]
    pub fn edge_wrap(&self, he: HalfEdgeId<I>) -> EdgeWrap {
        self.data(he).wrap
    }

    /// Check whether a face index is internal.
    #[inline]
    pub fn is_internal_face(&self, face: FaceId<I>) -> bool {
        face.index() < self.first_external_face_index
    }

    /// Neighbor count of a vertex.
    #[inline]
    pub fn vertex_neighbor_count(&self, v: VertexId<I>) -> usize {
        self.vertex_neighbor_counts[v.index()]
    }

    /// Neighbor count of a face.
    #[inline]
    pub fn face_neighbor_count(&self, f: FaceId<I>) -> usize {
        self.face_neighbor_counts[f.index()]
    }

    /// First half-edge of a vertex ring.
    #[inline]
    pub fn vertex_first_edge(&self, v: VertexId<I>) -> HalfEdgeId<I> {
        self.vertex_first_edges[v.index()]
    }

    /// First half-edge of a face ring.
    #[inline]
    pub fn face_first_edge(&self, f: FaceId<I>) -> HalfEdgeId<I> {
        self.face_first_edges[f.index()]
    }

    // ==================== Range checks ====================

    /// Check that a vertex index is in range.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IndexOutOfRange`] otherwise.
    pub fn check_vertex(&self, v: VertexId<I>) -> Result<()> {
        check_range("vertex", v.index(), self.num_vertices())
    }

    /// Check that a half-edge index is in range.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IndexOutOfRange`] otherwise.
    pub fn check_halfedge(&self, he: HalfEdgeId<I>) -> Result<()> {
        check_range("half-edge", he.index(), self.num_halfedges())
    }

    /// Check that a face index is in range.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IndexOutOfRange`] otherwise.
    pub fn check_face(&self, f: FaceId<I>) -> Result<()> {
        check_range("face", f.index(), self.num_faces())
    }

    // ==================== Validation ====================

    /// Check that the topology is consistent.
    ///
    /// Verifies that `twin` is an involution without fixed points, that every
    /// vertex and face ring closes after exactly its neighbor count (and not
    /// earlier), that every ring member has the ring's element as its near
    /// vertex or near face, and that `v_next(e) == twin(f_prev(e))`.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<()> {
        for (i, he) in self.half_edges.iter().enumerate() {
            let id = HalfEdgeId::<I>::new(i);
            if he.twin == id || self.twin(he.twin) != id {
                return Err(TopologyError::BrokenTwin { edge: i });
            }
            // f_next of the twin of v_next must lead back here.
            if self.f_next(self.twin(he.v_next)) != id {
                return Err(TopologyError::BrokenTwin { edge: i });
            }
        }

        for v in 0..self.num_vertices() {
            let vid = VertexId::<I>::new(v);
            let expected = self.vertex_neighbor_counts[v];
            let walked = walk_ring(
                self.vertex_first_edges[v],
                expected,
                |he| self.v_next(he),
                |he| self.near_vertex(he) == vid,
            );
            if walked != Some(expected) || expected == 0 {
                return Err(TopologyError::CorruptVertexRing {
                    vertex: v,
                    expected,
                    walked: walked.unwrap_or(expected.saturating_add(1)),
                });
            }
        }

        for f in 0..self.num_faces() {
            let fid = FaceId::<I>::new(f);
            let expected = self.face_neighbor_counts[f];
            let walked = walk_ring(
                self.face_first_edges[f],
                expected,
                |he| self.f_next(he),
                |he| self.near_face(he) == fid,
            );
            if walked != Some(expected) || expected == 0 {
                return Err(TopologyError::CorruptFaceRing {
                    face: f,
                    expected,
                    walked: walked.unwrap_or(expected.saturating_add(1)),
                });
            }
        }

        let vertex_total: usize = self.vertex_neighbor_counts.iter().sum();
        let face_total: usize = self.face_neighbor_counts.iter().sum();
        if vertex_total != self.num_halfedges() || face_total != self.num_halfedges() {
            return Err(TopologyError::MismatchedRawParts(format!(
                "neighbor counts sum to {} (vertices) and {} (faces) for {} half-edges",
                vertex_total,
                face_total,
                self.num_halfedges()
            )));
        }

        Ok(())
    }

    /// Check if the topology is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn check_references(&self) -> Result<()> {
        let num_halfedges = self.num_halfedges();
        for &he in self.vertex_first_edges.iter().chain(&self.face_first_edges) {
            check_range("half-edge", he.index(), num_halfedges)?;
        }
        for he in &self.half_edges {
            check_range("half-edge", he.twin.index(), num_halfedges)?;
            check_range("half-edge", he.v_next.index(), num_halfedges)?;
            check_range("half-edge", he.f_next.index(), num_halfedges)?;
            check_range("vertex", he.vertex.index(), self.num_vertices())?;
            check_range("face", he.face.index(), self.num_faces())?;
        }
        Ok(())
    }

    // ==================== Duality ====================

    /// Exchange the roles of vertices and faces in place.
    ///
    /// Every face becomes a vertex and every vertex a face; half-edge indices
    /// are preserved. Applying the swap twice restores the original topology.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::ExternalFacesPresent`] if the topology has
    /// external faces, which have no meaningful dual vertex. The topology is
    /// left untouched in that case.
    pub fn swap_vertices_and_faces(&mut self) -> Result<()> {
        if self.num_external_faces() > 0 {
            return Err(TopologyError::ExternalFacesPresent {
                count: self.num_external_faces(),
            });
        }

        // New rings in terms of the old ones: v_next' = f_prev, f_next' = v_prev.
        let rewired: Vec<(HalfEdgeId<I>, HalfEdgeId<I>)> = (0..self.num_halfedges())
            .map(|i| {
                let he = HalfEdgeId::new(i);
                (self.f_prev(he), self.v_prev(he))
            })
            .collect();

        for (he, (v_next, f_next)) in self.half_edges.iter_mut().zip(rewired) {
            let far_vertex = VertexId::new(he.face.index());
            let far_face = FaceId::new(he.vertex.index());
            he.vertex = far_vertex;
            he.face = far_face;
            he.v_next = v_next;
            he.f_next = f_next;
            he.wrap = he.wrap.swap_vert_and_face();
        }

        std::mem::swap(&mut self.vertex_neighbor_counts, &mut self.face_neighbor_counts);
        std::mem::swap(&mut self.vertex_first_edges, &mut self.face_first_edges);
        self.first_external_face_index = self.face_neighbor_counts.len();

        log::debug!(
            "swapped vertices and faces: {} vertices, {} faces",
            self.num_vertices(),
            self.num_faces()
        );
        Ok(())
    }

    /// Build the dual topology, leaving this one untouched.
    ///
    /// # Errors
    ///
    /// Same as [`Topology::swap_vertices_and_faces`].
    pub fn dual(&self) -> Result<Self> {
        let mut dual = self.clone();
        dual.swap_vertices_and_faces()?;
        Ok(dual)
    }
}

fn check_range(kind: &'static str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(TopologyError::IndexOutOfRange { kind, index, len })
    }
}

/// Walk a ring for at most `limit` steps. Returns the number of steps after
/// which the walk returned to `start`, or `None` if it did not return in time
/// or a member failed `belongs`.
fn walk_ring<I: MeshIndex>(
    start: HalfEdgeId<I>,
    limit: usize,
    next: impl Fn(HalfEdgeId<I>) -> HalfEdgeId<I>,
    belongs: impl Fn(HalfEdgeId<I>) -> bool,
) -> Option<usize> {
    let mut he = start;
    for step in 1..=limit {
        if !belongs(he) {
            return None;
        }
        he = next(he);
        if he == start {
            return Some(step);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::testing::{quad_grid, wrapped_quad_grid};
    use crate::topology::{build_topology, WrapRelation};

    #[test]
    fn test_twin_is_involution() {
        let topology: Topology = build_topology(&wrapped_quad_grid(3, 3)).unwrap();
        for i in 0..topology.num_halfedges() {
            let he = HalfEdgeId::new(i);
            assert_ne!(topology.twin(he), he);
            assert_eq!(topology.twin(topology.twin(he)), he);
        }
    }

    #[test]
    fn test_rings_close_after_neighbor_count() {
        let topology: Topology = build_topology(&quad_grid(3, 2)).unwrap();

        for v in 0..topology.num_vertices() {
            let vid = VertexId::new(v);
            let start = topology.vertex_first_edge(vid);
            let count = topology.vertex_neighbor_count(vid);
            let mut he = start;
            for step in 1..=count {
                he = topology.v_next(he);
                assert_eq!(he == start, step == count, "vertex {} step {}", v, step);
            }
        }

        for f in 0..topology.num_faces() {
            let fid = FaceId::new(f);
            let start = topology.face_first_edge(fid);
            let count = topology.face_neighbor_count(fid);
            let mut he = start;
            for step in 1..=count {
                he = topology.f_next(he);
                assert_eq!(he == start, step == count, "face {} step {}", f, step);
            }
        }
    }

    #[test]
    fn test_prev_inverts_next() {
        let topology: Topology = build_topology(&quad_grid(2, 2)).unwrap();
        for i in 0..topology.num_halfedges() {
            let he = HalfEdgeId::new(i);
            assert_eq!(topology.v_prev(topology.v_next(he)), he);
            assert_eq!(topology.v_next(topology.v_prev(he)), he);
            assert_eq!(topology.f_prev(topology.f_next(he)), he);
            assert_eq!(topology.f_next(topology.f_prev(he)), he);
            assert_eq!(topology.near_vertex(topology.f_next(he)), topology.far_vertex(he));
        }
    }

    #[test]
    fn test_validate_detects_corrupt_ring() {
        let mut topology: Topology = build_topology(&quad_grid(2, 2)).unwrap();
        topology.vertex_neighbor_counts[4] += 1;
        assert!(matches!(
            topology.validate(),
            Err(TopologyError::CorruptVertexRing { vertex: 4, .. })
        ));

        let mut topology: Topology = build_topology(&quad_grid(2, 2)).unwrap();
        topology.face_neighbor_counts[0] -= 1;
        assert!(matches!(
            topology.validate(),
            Err(TopologyError::CorruptFaceRing { face: 0, .. })
        ));
    }

    #[test]
    fn test_validate_detects_broken_twin() {
        let mut topology: Topology = build_topology(&quad_grid(1, 1)).unwrap();
        let he = HalfEdgeId::new(0);
        topology.data_mut(he).twin = he;
        assert_eq!(topology.validate(), Err(TopologyError::BrokenTwin { edge: 0 }));
    }

    #[test]
    fn test_raw_parts_round_trip() {
        let topology: Topology = build_topology(&wrapped_quad_grid(4, 3)).unwrap();
        let parts = topology.clone().into_raw_parts();
        let rebuilt = Topology::from_raw_parts(parts).unwrap();
        assert_eq!(rebuilt, topology);
    }

    #[test]
    fn test_raw_parts_rejects_dangling_index() {
        let topology: Topology = build_topology(&quad_grid(2, 1)).unwrap();
        let mut parts = topology.into_raw_parts();
        parts.half_edges[3].vertex = VertexId::new(99);
        assert!(matches!(
            Topology::from_raw_parts(parts),
            Err(TopologyError::IndexOutOfRange { kind: "vertex", index: 99, .. })
        ));
    }

    #[test]
    fn test_raw_parts_rejects_huge_neighbor_counts() {
        let topology: Topology = build_topology(&quad_grid(2, 2)).unwrap();
        let mut parts = topology.clone().into_raw_parts();
        parts.vertex_neighbor_counts[0] = usize::MAX;
        assert!(matches!(
            Topology::from_raw_parts(parts),
            Err(TopologyError::CorruptVertexRing { vertex: 0, expected: usize::MAX, .. })
        ));

        let mut parts = topology.into_raw_parts();
        parts.face_neighbor_counts[0] = usize::MAX;
        assert!(matches!(
            Topology::from_raw_parts(parts),
            Err(TopologyError::CorruptFaceRing { face: 0, expected: usize::MAX, .. })
        ));
    }

    #[test]
    fn test_clone_is_deep() {
        let topology: Topology = build_topology(&quad_grid(2, 2)).unwrap();
        let mut copy = topology.clone();
        copy.vertex_neighbor_counts[0] = 17;
        assert_ne!(topology.vertex_neighbor_counts[0], 17);
        assert!(topology.is_valid());
    }

    #[test]
    fn test_dual_of_torus() {
        let topology: Topology = build_topology(&wrapped_quad_grid(3, 4)).unwrap();
        let dual = topology.dual().unwrap();

        assert!(dual.is_valid());
        assert_eq!(dual.num_vertices(), topology.num_faces());
        assert_eq!(dual.num_faces(), topology.num_vertices());
        assert_eq!(dual.num_halfedges(), topology.num_halfedges());
        assert_eq!(dual.num_external_faces(), 0);

        // Dual of a quad torus is again a quad torus.
        assert!(dual.vertex_neighbor_counts().iter().all(|&c| c == 4));
        assert!(dual.face_neighbor_counts().iter().all(|&c| c == 4));

        for i in 0..topology.num_halfedges() {
            let he = HalfEdgeId::new(i);
            assert_eq!(dual.far_vertex(he).index(), topology.far_face(he).index());
            assert_eq!(
                dual.edge_wrap(he).offset(WrapRelation::VertToVert),
                topology.edge_wrap(he).offset(WrapRelation::FaceToFace)
            );
        }

        let mut twice = dual.clone();
        twice.swap_vertices_and_faces().unwrap();
        assert_eq!(twice, topology);
    }

    #[test]
    fn test_dual_rejects_external_faces() {
        let mut topology: Topology = build_topology(&quad_grid(2, 2)).unwrap();
        let before = topology.clone();
        assert_eq!(
            topology.swap_vertices_and_faces(),
            Err(TopologyError::ExternalFacesPresent { count: 1 })
        );
        assert_eq!(topology, before);
    }
}
