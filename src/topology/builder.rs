//! Topology construction from face-neighbor descriptions.
//!
//! A [`FaceNeighborIndexer`] lists, for every internal face, its corner
//! vertices in clockwise order. [`build_topology`] turns that into a fully
//! linked [`Topology`], synthesizing external half-edges and faces wherever
//! the description has an open boundary.
//!
//! # Example
//!
//! ```
//! use wrapmesh::topology::{build_topology, FaceNeighborIndexer, Topology};
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
//! let topology: Topology = build_topology(&Square).unwrap();
//! assert_eq!(topology.num_halfedges(), 10);
//! assert_eq!(topology.num_external_faces(), 1);
//! ```

use crate::error::{Result, TopologyError};

use super::halfedge::{HalfEdgeData, Topology};
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use super::wrap::{EdgeWrap, WrapOffset, WrapRelation};

/// Minimal description of a polygonal surface, consumed by [`build_topology`].
///
/// Faces `0..internal_face_count()` are described by their corner vertices in
/// clockwise order. External faces are not described; they are discovered
/// while building and must match `external_face_count()`.
pub trait FaceNeighborIndexer {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of undirected edges.
    fn edge_count(&self) -> usize;

    /// Total number of faces.
    fn face_count(&self) -> usize {
        self.internal_face_count().saturating_add(self.external_face_count())
    }

    /// Number of described faces.
    fn internal_face_count(&self) -> usize;

    /// Number of boundary loops of the surface.
    fn external_face_count(&self) -> usize;

    /// Number of corners of an internal face.
    fn neighbor_count(&self, face: usize) -> usize;

    /// The vertex at a corner of an internal face.
    fn neighbor_vertex_index(&self, face: usize, neighbor: usize) -> usize;

    /// Wrap hint for the side of `face` that ends at corner `neighbor`.
    ///
    /// The `FaceToVert` group is the offset of that corner as seen from the
    /// face. Any other group is merged into the built half-edge as is.
    fn edge_wrap(&self, _face: usize, _neighbor: usize) -> EdgeWrap {
        EdgeWrap::NONE
    }
}

/// How much checking happens before construction starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    /// Reject malformed descriptions before allocating anything.
    #[default]
    Eager,
    /// Start building right away and rely on the bounded boundary walk and
    /// final ring validation to catch malformed descriptions.
    Lazy,
}

/// Options for [`build_topology_with`].
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Upfront checking of the description.
    pub validation: Validation,

    /// Run [`Topology::validate`] on the result.
    pub validate_result: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            validation: Validation::Eager,
            validate_result: true,
        }
    }
}

impl BuildOptions {
    /// Set the upfront validation mode.
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Enable or disable validation of the built topology.
    pub fn with_validate_result(mut self, validate: bool) -> Self {
        self.validate_result = validate;
        self
    }
}

/// Build a topology with default options.
///
/// # Errors
///
/// See [`build_topology_with`].
pub fn build_topology<I: MeshIndex, X: FaceNeighborIndexer + ?Sized>(
    indexer: &X,
) -> Result<Topology<I>> {
    build_topology_with(indexer, &BuildOptions::default())
}

/// Build a topology from a face-neighbor description.
///
/// # Errors
///
/// - [`TopologyError::InvalidVertexIndex`], [`TopologyError::DegenerateFace`]
///   or [`TopologyError::IsolatedVertex`] for malformed faces.
/// - [`TopologyError::EdgeCountMismatch`] or
///   [`TopologyError::ExternalFaceCountMismatch`] if the declared counts are wrong.
/// - [`TopologyError::UnclosedExternalFace`] or
///   [`TopologyError::CorruptVertexRing`] if the faces do not fit together
///   into a surface.
pub fn build_topology_with<I: MeshIndex, X: FaceNeighborIndexer + ?Sized>(
    indexer: &X,
    options: &BuildOptions,
) -> Result<Topology<I>> {
    if options.validation == Validation::Eager {
        check_description(indexer)?;
    }

    let mut draft = Draft::new(indexer);
    draft.add_internal_faces(indexer)?;
    draft.pair_twins();

    let found = draft.vertex.len() / 2;
    if found != indexer.edge_count() {
        return Err(TopologyError::EdgeCountMismatch {
            expected: indexer.edge_count(),
            found,
        });
    }

    draft.link_vertex_rings()?;
    draft.close_external_faces(indexer.external_face_count())?;
    draft.assign_wraps()?;
    let topology = draft.finish()?;

    if options.validate_result {
        topology.validate()?;
    }

    log::debug!(
        "built topology: {} vertices, {} half-edges, {} internal and {} external faces",
        topology.num_vertices(),
        topology.num_halfedges(),
        topology.num_internal_faces(),
        topology.num_external_faces()
    );
    Ok(topology)
}

/// Check a description without building anything.
fn check_description<X: FaceNeighborIndexer + ?Sized>(indexer: &X) -> Result<()> {
    let vertex_count = indexer.vertex_count();
    let mut referenced = vec![false; vertex_count];
    let mut half_edges = 0usize;

    for face in 0..indexer.internal_face_count() {
        let neighbor_count = indexer.neighbor_count(face);
        if neighbor_count < 2 {
            return Err(TopologyError::DegenerateFace {
                face,
                neighbor_count,
            });
        }
        for neighbor in 0..neighbor_count {
            let vertex = indexer.neighbor_vertex_index(face, neighbor);
            if vertex >= vertex_count {
                return Err(TopologyError::InvalidVertexIndex { face, vertex });
            }
            referenced[vertex] = true;
        }
        half_edges += neighbor_count;
    }

    if let Some(vertex) = referenced.iter().position(|&r| !r) {
        return Err(TopologyError::IsolatedVertex { vertex });
    }

    // Every edge has one or two described sides, and exactly two when
    // nothing is open.
    let expected = indexer.edge_count();
    let closed = indexer.external_face_count() == 0;
    let sides = expected.checked_mul(2);
    let too_many = sides.map_or(false, |sides| half_edges > sides);
    if too_many || (closed && sides != Some(half_edges)) {
        return Err(TopologyError::EdgeCountMismatch {
            expected,
            found: (half_edges + 1) / 2,
        });
    }
    if half_edges < expected {
        return Err(TopologyError::EdgeCountMismatch {
            expected,
            found: half_edges,
        });
    }
    Ok(())
}

/// Upper bound on storage reserved from declared counts before any face is read.
const MAX_CAPACITY_HINT: usize = 1 << 20;

/// Construction state with plain `usize` indices.
///
/// Internal half-edges occupy `0..internal_edge_count` and are grouped by
/// face; synthesized external half-edges follow.
struct Draft {
    vertex_count: usize,
    internal_face_count: usize,
    internal_edge_count: usize,

    origin: Vec<usize>,
    vertex: Vec<usize>,
    twin: Vec<Option<usize>>,
    v_next: Vec<Option<usize>>,
    f_next: Vec<Option<usize>>,
    near_face: Vec<Option<usize>>,
    wrap: Vec<EdgeWrap>,

    /// Offsets of the near and far vertex as seen from the near face, for
    /// internal half-edges.
    corner_offsets: Vec<(WrapOffset, WrapOffset)>,

    /// Half-edges leaving each vertex, in index order.
    outgoing: Vec<Vec<usize>>,

    face_first_edges: Vec<usize>,
    face_neighbor_counts: Vec<usize>,
}

impl Draft {
    fn new<X: FaceNeighborIndexer + ?Sized>(indexer: &X) -> Self {
        // Declared counts are unchecked in lazy mode.
        let capacity = indexer.edge_count().saturating_mul(2).min(MAX_CAPACITY_HINT);
        let face_capacity = indexer.face_count().min(MAX_CAPACITY_HINT);
        Self {
            vertex_count: indexer.vertex_count(),
            internal_face_count: indexer.internal_face_count(),
            internal_edge_count: 0,
            origin: Vec::with_capacity(capacity),
            vertex: Vec::with_capacity(capacity),
            twin: Vec::with_capacity(capacity),
            v_next: Vec::with_capacity(capacity),
            f_next: Vec::with_capacity(capacity),
            near_face: Vec::with_capacity(capacity),
            wrap: Vec::with_capacity(capacity),
            corner_offsets: Vec::with_capacity(capacity),
            outgoing: vec![Vec::new(); indexer.vertex_count()],
            face_first_edges: Vec::with_capacity(face_capacity),
            face_neighbor_counts: Vec::with_capacity(face_capacity),
        }
    }

    fn push_edge(&mut self, origin: usize, vertex: usize, face: Option<usize>, wrap: EdgeWrap) -> usize {
        let edge = self.vertex.len();
        self.origin.push(origin);
        self.vertex.push(vertex);
        self.twin.push(None);
        self.v_next.push(None);
        self.f_next.push(None);
        self.near_face.push(face);
        self.wrap.push(wrap);
        self.outgoing[origin].push(edge);
        edge
    }

    #[inline]
    fn is_external(&self, edge: usize) -> bool {
        edge >= self.internal_edge_count
    }

    fn twin_of(&self, edge: usize) -> Result<usize> {
        self.twin[edge].ok_or(TopologyError::BrokenTwin { edge })
    }

    /// First pass: one contiguous run of half-edges per described face.
    fn add_internal_faces<X: FaceNeighborIndexer + ?Sized>(&mut self, indexer: &X) -> Result<()> {
        let mut corners = Vec::new();
        let mut hints = Vec::new();

        for face in 0..self.internal_face_count {
            let neighbor_count = indexer.neighbor_count(face);
            if neighbor_count < 2 {
                return Err(TopologyError::DegenerateFace {
                    face,
                    neighbor_count,
                });
            }

            corners.clear();
            hints.clear();
            for neighbor in 0..neighbor_count {
                let vertex = indexer.neighbor_vertex_index(face, neighbor);
                if vertex >= self.vertex_count {
                    return Err(TopologyError::InvalidVertexIndex { face, vertex });
                }
                corners.push(vertex);
                hints.push(indexer.edge_wrap(face, neighbor));
            }

            let base = self.vertex.len();
            for i in 0..neighbor_count {
                let prev = (i + neighbor_count - 1) % neighbor_count;
                let near_offset = hints[prev].offset(WrapRelation::FaceToVert);
                let far_offset = hints[i].offset(WrapRelation::FaceToVert);
                let vert_to_vert = near_offset.invert().chain(far_offset);
                let wrap = (hints[i] | EdgeWrap::from_offset(WrapRelation::VertToVert, vert_to_vert))
                    .normalize();

                let edge = self.push_edge(corners[prev], corners[i], Some(face), wrap);
                self.f_next[edge] = Some(base + (i + 1) % neighbor_count);
                self.corner_offsets.push((near_offset, far_offset));
            }

            self.face_first_edges.push(base);
            self.face_neighbor_counts.push(neighbor_count);
        }

        self.internal_edge_count = self.vertex.len();
        Ok(())
    }

    /// Second pass: pair each half-edge with one pointing back, or synthesize
    /// an external one.
    fn pair_twins(&mut self) {
        for edge in 0..self.internal_edge_count {
            if self.twin[edge].is_some() {
                continue;
            }

            let (near, far) = (self.origin[edge], self.vertex[edge]);
            let expected = self.wrap[edge].offset(WrapRelation::VertToVert).invert();
            let found = self.outgoing[far].iter().copied().find(|&other| {
                other != edge
                    && self.twin[other].is_none()
                    && self.vertex[other] == near
                    && self.wrap[other].offset(WrapRelation::VertToVert) == expected
            });

            let twin = match found {
                Some(other) => other,
                None => {
                    let inverse = self.wrap[edge].invert();
                    self.push_edge(far, near, None, inverse)
                }
            };
            self.twin[edge] = Some(twin);
            self.twin[twin] = Some(edge);
        }
    }

    /// Third pass: order the half-edges leaving each vertex.
    ///
    /// Inside a face ring `v_next(f_next(e)) == twin(e)`. What remains are the
    /// external half-edges, which close the gaps between runs of internal
    /// ones around boundary vertices.
    fn link_vertex_rings(&mut self) -> Result<()> {
        for edge in 0..self.internal_edge_count {
            if let Some(next) = self.f_next[edge] {
                self.v_next[next] = self.twin[edge];
            }
        }

        let mut runs: Vec<(usize, usize)> = Vec::new();
        for vertex in 0..self.vertex_count {
            let ring_len = self.outgoing[vertex].len();
            if ring_len == 0 {
                return Err(TopologyError::IsolatedVertex { vertex });
            }

            // A run starts after a gap in the boundary and ends at an external edge.
            runs.clear();
            for &start in &self.outgoing[vertex] {
                if self.is_external(start) || !self.is_external(self.twin_of(start)?) {
                    continue;
                }
                let mut edge = start;
                let mut walked = 0;
                while !self.is_external(edge) {
                    walked += 1;
                    edge = match self.v_next[edge] {
                        Some(next) if walked <= ring_len => next,
                        _ => {
                            return Err(TopologyError::CorruptVertexRing {
                                vertex,
                                expected: ring_len,
                                walked,
                            })
                        }
                    };
                }
                runs.push((start, edge));
            }

            for (k, &(_, end)) in runs.iter().enumerate() {
                let (next_start, _) = runs[(k + 1) % runs.len()];
                self.v_next[end] = Some(next_start);
            }
        }
        Ok(())
    }

    /// Walk the external rings, giving each one a new face.
    fn close_external_faces(&mut self, expected: usize) -> Result<()> {
        let edge_count = self.vertex.len();

        // f_next(x) == v_prev(twin(x))
        let mut v_prev = vec![None; edge_count];
        for (edge, next) in self.v_next.iter().enumerate() {
            if let Some(next) = *next {
                v_prev[next] = Some(edge);
            }
        }
        for edge in self.internal_edge_count..edge_count {
            self.f_next[edge] = v_prev[self.twin_of(edge)?];
        }

        let limit = self.vertex_count;
        let mut found = 0;
        for start in self.internal_edge_count..edge_count {
            if self.near_face[start].is_some() {
                continue;
            }

            let face = self.internal_face_count + found;
            let mut edge = start;
            let mut steps = 0;
            loop {
                self.near_face[edge] = Some(face);
                steps += 1;
                edge = match self.f_next[edge] {
                    Some(next) => next,
                    None => return Err(TopologyError::UnclosedExternalFace { edge: start, limit }),
                };
                if edge == start {
                    break;
                }
                if steps >= limit || self.near_face[edge].is_some() {
                    return Err(TopologyError::UnclosedExternalFace { edge: start, limit });
                }
            }

            self.face_first_edges.push(start);
            self.face_neighbor_counts.push(steps);
            found += 1;
        }

        if found != expected {
            return Err(TopologyError::ExternalFaceCountMismatch { expected, found });
        }
        Ok(())
    }

    /// Derive every wrap relation from the per-corner face offsets.
    ///
    /// The frame of an undirected edge is the near face of its lower-indexed
    /// half-edge, and an external face borrows the frame of the internal face
    /// across each of its sides.
    fn assign_wraps(&mut self) -> Result<()> {
        let twins = (0..self.vertex.len())
            .map(|edge| self.twin_of(edge))
            .collect::<Result<Vec<_>>>()?;

        for edge in 0..self.internal_edge_count {
            let (near_offset, far_offset) = self.corner_offsets[edge];
            let mut wrap = self.wrap[edge]
                | EdgeWrap::from_offset(WrapRelation::FaceToVert, far_offset);
            if edge < twins[edge] {
                wrap = wrap
                    | EdgeWrap::from_offset(WrapRelation::EdgeToVert, far_offset)
                    | EdgeWrap::from_offset(WrapRelation::VertToEdge, near_offset.invert());
            }
            self.wrap[edge] = wrap.normalize();
        }
        self.merge_twins(&twins);

        for edge in 0..self.internal_edge_count {
            let (near_offset, _) = self.corner_offsets[edge];
            let mut wrap = self.wrap[edge];
            let face_to_face = if self.is_external(twins[edge]) {
                wrap = wrap | EdgeWrap::from_offset(WrapRelation::VertToFace, near_offset.invert());
                WrapOffset::NONE
            } else {
                near_offset.chain(wrap.offset(WrapRelation::VertToFace))
            };
            wrap = wrap | EdgeWrap::from_offset(WrapRelation::FaceToFace, face_to_face);
            if edge < twins[edge] {
                wrap = wrap | EdgeWrap::from_offset(WrapRelation::EdgeToFace, face_to_face);
            }
            self.wrap[edge] = wrap.normalize();
        }
        self.merge_twins(&twins);
        Ok(())
    }

    fn merge_twins(&mut self, twins: &[usize]) {
        for (edge, &twin) in twins.iter().enumerate() {
            if edge < twin {
                let (a, b) = EdgeWrap::cross_merge_twins(self.wrap[edge], self.wrap[twin]);
                self.wrap[edge] = a;
                self.wrap[twin] = b;
            }
        }
    }

    fn finish<I: MeshIndex>(self) -> Result<Topology<I>> {
        let mut half_edges = Vec::with_capacity(self.vertex.len());
        for edge in 0..self.vertex.len() {
            let twin = self.twin_of(edge)?;
            let v_next = self.v_next[edge].ok_or(TopologyError::CorruptVertexRing {
                vertex: self.origin[edge],
                expected: self.outgoing[self.origin[edge]].len(),
                walked: 0,
            })?;
            let (f_next, face) = match (self.f_next[edge], self.near_face[twin]) {
                (Some(f_next), Some(face)) => (f_next, face),
                _ => {
                    return Err(TopologyError::UnclosedExternalFace {
                        edge,
                        limit: self.vertex_count,
                    })
                }
            };
            half_edges.push(HalfEdgeData {
                twin: HalfEdgeId::new(twin),
                v_next: HalfEdgeId::new(v_next),
                f_next: HalfEdgeId::new(f_next),
                vertex: VertexId::new(self.vertex[edge]),
                face: FaceId::new(face),
                wrap: self.wrap[edge],
            });
        }

        Ok(Topology {
            vertex_neighbor_counts: self.outgoing.iter().map(Vec::len).collect(),
            vertex_first_edges: self
                .outgoing
                .iter()
                .map(|ring| HalfEdgeId::new(ring.first().copied().unwrap_or(0)))
                .collect(),
            half_edges,
            face_neighbor_counts: self.face_neighbor_counts,
            face_first_edges: self.face_first_edges.into_iter().map(HalfEdgeId::new).collect(),
            first_external_face_index: self.internal_face_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::testing::{cylinder_quad_grid, quad_grid, wrapped_quad_grid, FaceList};

    #[test]
    fn test_wrapped_grid_counts() {
        let topology: Topology = build_topology(&wrapped_quad_grid(3, 3)).unwrap();

        assert_eq!(topology.num_internal_faces(), 9);
        assert_eq!(topology.num_external_faces(), 0);
        assert_eq!(topology.num_vertices(), 9);
        assert_eq!(topology.num_halfedges(), 36);
        assert_eq!(topology.num_edges(), 18);
        assert!(topology.vertex_neighbor_counts().iter().all(|&c| c == 4));
        assert!(topology.face_neighbor_counts().iter().all(|&c| c == 4));
        assert!(topology.is_valid());
    }

    #[test]
    fn test_open_grid_perimeter() {
        let topology: Topology = build_topology(&quad_grid(3, 3)).unwrap();
        assert_eq!(topology.num_external_faces(), 1);
        let external = FaceId::new(topology.first_external_face_index());
        assert_eq!(topology.face_neighbor_count(external), 12);

        let topology: Topology = build_topology(&quad_grid(2, 2)).unwrap();
        assert_eq!(topology.num_external_faces(), 1);
        let external = FaceId::new(topology.first_external_face_index());
        assert_eq!(topology.face_neighbor_count(external), 8);
    }

    #[test]
    fn test_cylinder_has_two_boundaries() {
        let topology: Topology = build_topology(&cylinder_quad_grid(4, 2)).unwrap();
        assert_eq!(topology.num_external_faces(), 2);
        assert_eq!(topology.num_vertices(), 12);
        let first = topology.first_external_face_index();
        assert_eq!(topology.face_neighbor_count(FaceId::new(first)), 4);
        assert_eq!(topology.face_neighbor_count(FaceId::new(first + 1)), 4);
    }

    #[test]
    fn test_face_ring_starts_at_first_corner() {
        let grid = quad_grid(2, 2);
        let topology: Topology = build_topology(&grid).unwrap();
        for face in 0..4 {
            let first = topology.face_first_edge(FaceId::new(face));
            assert_eq!(
                topology.far_vertex(first).index(),
                grid.neighbor_vertex_index(face, 0)
            );
        }
    }

    #[test]
    fn test_small_index_type() {
        let topology: Topology<u16> = build_topology(&wrapped_quad_grid(4, 4)).unwrap();
        assert_eq!(topology.num_halfedges(), 64);
        assert!(topology.is_valid());
    }

    #[test]
    fn test_wrap_relations_on_torus() {
        let topology: Topology = build_topology(&wrapped_quad_grid(3, 3)).unwrap();

        // Every half-edge crossing the seam between column 2 and column 0
        // sees its far vertex one period forward.
        let mut forward = 0;
        for he in topology.half_edges() {
            let wrap = he.wrap();
            let vert_to_vert = wrap.offset(WrapRelation::VertToVert);
            assert_eq!(wrap, wrap.normalize());
            assert_eq!(he.twin().wrap(), wrap.invert());
            if vert_to_vert == WrapOffset::POS_AXIS0 {
                forward += 1;
            }
        }
        // Three rows of seam edges.
        assert_eq!(forward, 3);
    }

    #[test]
    fn test_face_to_face_across_seam() {
        let topology: Topology = build_topology(&wrapped_quad_grid(3, 3)).unwrap();
        // Face 2 is the last column of the first row; its neighbor across the
        // seam is face 0, one period forward.
        let face = topology.face(FaceId::new(2));
        let across: Vec<_> = face
            .edges()
            .filter(|e| e.far_face().index() == 0)
            .map(|e| e.wrap().offset(WrapRelation::FaceToFace))
            .collect();
        assert_eq!(across, vec![WrapOffset::POS_AXIS0]);
    }

    #[test]
    fn test_open_grid_has_no_wraps() {
        let topology: Topology = build_topology(&quad_grid(3, 2)).unwrap();
        assert!(topology.half_edges().all(|he| !he.is_wrapped()));
    }

    #[test]
    fn test_rejects_invalid_vertex() {
        let list = FaceList::new(3, vec![vec![0, 1, 5]]).with_edge_count(3);
        assert_eq!(
            build_topology::<u32, _>(&list).unwrap_err(),
            TopologyError::InvalidVertexIndex { face: 0, vertex: 5 }
        );
        let lazy = BuildOptions::default().with_validation(Validation::Lazy);
        assert_eq!(
            build_topology_with::<u32, _>(&list, &lazy).unwrap_err(),
            TopologyError::InvalidVertexIndex { face: 0, vertex: 5 }
        );
    }

    #[test]
    fn test_rejects_degenerate_face() {
        let list = FaceList::new(3, vec![vec![0, 1, 2], vec![2]]).with_edge_count(3);
        assert_eq!(
            build_topology::<u32, _>(&list).unwrap_err(),
            TopologyError::DegenerateFace { face: 1, neighbor_count: 1 }
        );
    }

    #[test]
    fn test_rejects_isolated_vertex() {
        let list = FaceList::new(4, vec![vec![0, 1, 2]]).with_edge_count(3);
        assert_eq!(
            build_topology::<u32, _>(&list).unwrap_err(),
            TopologyError::IsolatedVertex { vertex: 3 }
        );
        let lazy = BuildOptions::default().with_validation(Validation::Lazy);
        assert_eq!(
            build_topology_with::<u32, _>(&list, &lazy).unwrap_err(),
            TopologyError::IsolatedVertex { vertex: 3 }
        );
    }

    #[test]
    fn test_rejects_wrong_edge_count() {
        let list = FaceList::new(3, vec![vec![0, 1, 2]]).with_edge_count(4);
        assert!(matches!(
            build_topology::<u32, _>(&list),
            Err(TopologyError::EdgeCountMismatch { expected: 4, .. })
        ));
        let lazy = BuildOptions::default().with_validation(Validation::Lazy);
        assert_eq!(
            build_topology_with::<u32, _>(&list, &lazy).unwrap_err(),
            TopologyError::EdgeCountMismatch { expected: 4, found: 3 }
        );
    }

    #[test]
    fn test_rejects_unrepresentable_edge_count() {
        let list = FaceList::new(3, vec![vec![0, 1, 2]]).with_edge_count(usize::MAX);
        assert_eq!(
            build_topology::<u32, _>(&list).unwrap_err(),
            TopologyError::EdgeCountMismatch { expected: usize::MAX, found: 3 }
        );
        let lazy = BuildOptions::default().with_validation(Validation::Lazy);
        assert_eq!(
            build_topology_with::<u32, _>(&list, &lazy).unwrap_err(),
            TopologyError::EdgeCountMismatch { expected: usize::MAX, found: 3 }
        );

        let closed = FaceList::new(3, vec![vec![0, 1, 2], vec![0, 2, 1]])
            .with_edge_count(usize::MAX)
            .with_external_face_count(0);
        assert!(matches!(
            build_topology::<u32, _>(&closed),
            Err(TopologyError::EdgeCountMismatch { expected: usize::MAX, .. })
        ));
    }

    #[test]
    fn test_rejects_wrong_external_face_count() {
        let list = FaceList::new(3, vec![vec![0, 1, 2]])
            .with_edge_count(3)
            .with_external_face_count(2);
        assert_eq!(
            build_topology::<u32, _>(&list).unwrap_err(),
            TopologyError::ExternalFaceCountMismatch { expected: 2, found: 1 }
        );
    }

    #[test]
    fn test_two_triangles() {
        let list = FaceList::new(4, vec![vec![0, 2, 1], vec![0, 3, 2]]).with_edge_count(5);
        let topology: Topology = build_topology(&list).unwrap();
        assert_eq!(topology.num_halfedges(), 10);
        assert_eq!(topology.face_neighbor_count(FaceId::new(2)), 4);
        assert_eq!(topology.vertex_neighbor_count(VertexId::new(0)), 3);
        assert_eq!(topology.vertex_neighbor_count(VertexId::new(1)), 2);
    }

    #[test]
    fn test_closed_tetrahedron() {
        // Corners listed clockwise seen from outside.
        let list = FaceList::new(
            4,
            vec![vec![0, 1, 2], vec![0, 2, 3], vec![0, 3, 1], vec![1, 3, 2]],
        )
        .with_edge_count(6)
        .with_external_face_count(0);
        let topology: Topology = build_topology(&list).unwrap();
        assert_eq!(topology.num_external_faces(), 0);
        assert!(topology.vertex_neighbor_counts().iter().all(|&c| c == 3));
        assert!(topology.is_valid());
    }

    #[test]
    fn test_lazy_build_matches_eager() {
        let grid = cylinder_quad_grid(3, 3);
        let eager: Topology = build_topology(&grid).unwrap();
        let lazy: Topology = build_topology_with(
            &grid,
            &BuildOptions::default()
                .with_validation(Validation::Lazy)
                .with_validate_result(false),
        )
        .unwrap();
        assert_eq!(eager, lazy);
    }
}
