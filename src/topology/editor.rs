//! Local topology edits.
//!
//! A **pivot** moves the far vertex of one half-edge to the next or previous
//! neighbor of that vertex, carrying one side of a neighboring face along
//! with it. A **spin** pivots both ends of an edge in the same direction,
//! which rotates the edge inside the union of its two faces. Both are O(1)
//! and touch four half-edges, two vertices and two faces.
//!
//! Neighbor counts may drop to 2 but never below. An edit whose
//! precondition fails returns [`TopologyError::IllegalOperation`] and leaves
//! the topology untouched.

use crate::error::{Result, TopologyError};

use super::halfedge::Topology;
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use super::wrap::{WrapOffset, WrapRelation};

const MIN_NEIGHBORS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// The elements whose neighbor counts a pivot changes.
#[derive(Debug, Clone, Copy)]
struct PivotCounts<I: MeshIndex> {
    vertex_loses: VertexId<I>,
    vertex_gains: VertexId<I>,
    face_loses: FaceId<I>,
    face_gains: FaceId<I>,
}

impl<I: MeshIndex> Topology<I> {
    /// Move the far vertex of `edge` to the next neighbor clockwise around it.
    ///
    /// The side of the far face that followed the old far vertex moves into
    /// the near face.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::IndexOutOfRange`] if `edge` is out of range.
    /// - [`TopologyError::IllegalOperation`] if the far vertex or the far face
    ///   would drop below two neighbors, or the neighborhood is degenerate.
    pub fn pivot_forward(&mut self, edge: HalfEdgeId<I>) -> Result<()> {
        self.check_halfedge(edge)?;
        self.check_pivot("pivot_forward", edge, Direction::Forward)?;
        self.apply_pivot_forward(edge);
        Ok(())
    }

    /// Move the far vertex of `edge` to the previous neighbor around it.
    ///
    /// The side of the near face that followed `edge` moves into the far face.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::IndexOutOfRange`] if `edge` is out of range.
    /// - [`TopologyError::IllegalOperation`] if the far vertex or the near face
    ///   would drop below two neighbors, or the neighborhood is degenerate.
    pub fn pivot_backward(&mut self, edge: HalfEdgeId<I>) -> Result<()> {
        self.check_halfedge(edge)?;
        self.check_pivot("pivot_backward", edge, Direction::Backward)?;
        self.apply_pivot_backward(edge);
        Ok(())
    }

    /// Pivot both ends of `edge` forward.
    ///
    /// # Errors
    ///
    /// Same as [`Topology::pivot_forward`], for either end.
    pub fn spin_forward(&mut self, edge: HalfEdgeId<I>) -> Result<()> {
        self.check_halfedge(edge)?;
        self.check_spin("spin_forward", edge, Direction::Forward)?;
        let twin = self.twin(edge);
        self.apply_pivot_forward(edge);
        self.apply_pivot_forward(twin);
        Ok(())
    }

    /// Pivot both ends of `edge` backward.
    ///
    /// # Errors
    ///
    /// Same as [`Topology::pivot_backward`], for either end.
    pub fn spin_backward(&mut self, edge: HalfEdgeId<I>) -> Result<()> {
        self.check_halfedge(edge)?;
        self.check_spin("spin_backward", edge, Direction::Backward)?;
        let twin = self.twin(edge);
        self.apply_pivot_backward(edge);
        self.apply_pivot_backward(twin);
        Ok(())
    }

    fn pivot_counts(&self, edge: HalfEdgeId<I>, direction: Direction) -> PivotCounts<I> {
        let twin = self.twin(edge);
        match direction {
            Direction::Forward => PivotCounts {
                vertex_loses: self.far_vertex(edge),
                vertex_gains: self.far_vertex(self.v_next(twin)),
                face_loses: self.far_face(edge),
                face_gains: self.near_face(edge),
            },
            Direction::Backward => PivotCounts {
                vertex_loses: self.far_vertex(edge),
                vertex_gains: self.far_vertex(self.f_next(edge)),
                face_loses: self.near_face(edge),
                face_gains: self.far_face(edge),
            },
        }
    }

    /// The half-edges a pivot rewires, which must all differ.
    fn pivot_neighborhood(&self, edge: HalfEdgeId<I>, direction: Direction) -> [HalfEdgeId<I>; 6] {
        let twin = self.twin(edge);
        match direction {
            Direction::Forward => {
                let p = self.v_next(twin);
                let k = self.twin(p);
                [edge, twin, p, k, self.f_next(edge), self.f_prev(k)]
            }
            Direction::Backward => {
                let q = self.f_next(edge);
                [edge, twin, q, self.twin(q), self.f_next(q), self.f_prev(twin)]
            }
        }
    }

    fn check_pivot(
        &self,
        operation: &'static str,
        edge: HalfEdgeId<I>,
        direction: Direction,
    ) -> Result<()> {
        let counts = self.pivot_counts(edge, direction);
        self.check_vertex_count(operation, counts.vertex_loses, 0)?;
        self.check_face_count(operation, counts.face_loses, 0)?;

        let neighborhood = self.pivot_neighborhood(edge, direction);
        for (i, a) in neighborhood.iter().enumerate() {
            if neighborhood[i + 1..].contains(a) {
                return Err(TopologyError::illegal(
                    operation,
                    format!("half-edge {} has a degenerate neighborhood", edge.index()),
                ));
            }
        }
        Ok(())
    }

    /// Check both pivots of a spin against the topology as it will be when
    /// each one runs.
    fn check_spin(&self, operation: &'static str, edge: HalfEdgeId<I>, direction: Direction) -> Result<()> {
        let twin = self.twin(edge);
        self.check_pivot(operation, edge, direction)?;
        self.check_pivot(operation, twin, direction)?;

        // The second pivot must see the same neighborhood it would have seen
        // before the first one ran.
        let (neighbor, touched) = match direction {
            Direction::Forward => (
                self.f_prev(edge),
                [self.f_next(edge), twin, self.twin(self.v_next(twin))],
            ),
            Direction::Backward => (
                self.f_next(twin),
                [edge, self.f_prev(twin), self.f_next(edge)],
            ),
        };
        if touched.contains(&neighbor) {
            return Err(TopologyError::illegal(
                operation,
                format!("half-edge {} has a degenerate neighborhood", edge.index()),
            ));
        }

        let first = self.pivot_counts(edge, direction);
        let second = self.pivot_counts(twin, direction);
        let vertex_delta = isize::from(second.vertex_loses == first.vertex_gains)
            - isize::from(second.vertex_loses == first.vertex_loses);
        let face_delta = isize::from(second.face_loses == first.face_gains)
            - isize::from(second.face_loses == first.face_loses);
        self.check_vertex_count(operation, second.vertex_loses, vertex_delta)?;
        self.check_face_count(operation, second.face_loses, face_delta)
    }

    fn check_vertex_count(&self, operation: &'static str, vertex: VertexId<I>, delta: isize) -> Result<()> {
        let count = self.vertex_neighbor_count(vertex) as isize + delta;
        if count <= MIN_NEIGHBORS as isize {
            return Err(TopologyError::illegal(
                operation,
                format!("vertex {} would drop below {} neighbors", vertex.index(), MIN_NEIGHBORS),
            ));
        }
        Ok(())
    }

    fn check_face_count(&self, operation: &'static str, face: FaceId<I>, delta: isize) -> Result<()> {
        let count = self.face_neighbor_count(face) as isize + delta;
        if count <= MIN_NEIGHBORS as isize {
            return Err(TopologyError::illegal(
                operation,
                format!("face {} would drop below {} neighbors", face.index(), MIN_NEIGHBORS),
            ));
        }
        Ok(())
    }

    /// `edge` runs from A to B, `twin` from B to A. The near face of `edge` is
    /// F and its far face G. `p` leaves B towards C right after `twin`, so its
    /// twin `k` is the side of G ending at B. Afterwards `edge` runs from A to
    /// C and `k` is a side of F.
    fn apply_pivot_forward(&mut self, edge: HalfEdgeId<I>) {
        let twin = self.twin(edge);
        let p = self.v_next(twin);
        let k = self.twin(p);
        let r = self.f_prev(k);
        let q = self.f_next(edge);
        let r_twin = self.twin(r);

        let b = self.far_vertex(edge);
        let c = self.far_vertex(p);
        let f = self.near_face(edge);
        let g = self.far_face(edge);

        let b_to_c = self.edge_wrap(p).offset(WrapRelation::VertToVert);
        let g_to_f = self.edge_wrap(twin).offset(WrapRelation::FaceToFace);
        let both_internal = self.is_internal_face(f) && self.is_internal_face(g);

        self.data_mut(edge).vertex = c;
        self.data_mut(edge).f_next = k;
        self.data_mut(k).f_next = q;
        self.data_mut(r).f_next = twin;
        self.data_mut(q).v_next = p;
        self.data_mut(twin).v_next = r_twin;
        self.data_mut(k).v_next = twin;
        self.data_mut(p).face = f;

        if self.vertex_first_edges[b.index()] == twin {
            self.vertex_first_edges[b.index()] = p;
        }
        if self.face_first_edges[g.index()] == k {
            self.face_first_edges[g.index()] = twin;
        }
        self.vertex_neighbor_counts[b.index()] -= 1;
        self.vertex_neighbor_counts[c.index()] += 1;
        self.face_neighbor_counts[f.index()] += 1;
        self.face_neighbor_counts[g.index()] -= 1;

        let data = self.data_mut(edge);
        data.wrap = data.wrap.modify_target_vert(b_to_c);
        let data = self.data_mut(twin);
        data.wrap = data.wrap.modify_source_vert(b_to_c);
        let g_to_f = if both_internal { g_to_f } else { self.reframe_offset(k, edge, f) };
        let data = self.data_mut(k);
        data.wrap = data.wrap.modify_source_face(g_to_f);
        let data = self.data_mut(p);
        data.wrap = data.wrap.modify_target_face(g_to_f);

        log::trace!(
            "pivot forward {:?}: {:?} -> {:?}, {:?} moved from {:?} to {:?}",
            edge,
            b,
            c,
            k,
            g,
            f
        );
    }

    /// `edge` runs from A to B with near face F and far face G. `q` follows
    /// `edge` in F and runs from B to Q. Afterwards `edge` runs from A to Q
    /// and `q` is a side of G, right before `twin`.
    fn apply_pivot_backward(&mut self, edge: HalfEdgeId<I>) {
        let twin = self.twin(edge);
        let q = self.f_next(edge);
        let q_twin = self.twin(q);
        let s = self.f_next(q);
        let u = self.f_prev(twin);
        let u_twin = self.twin(u);

        let b = self.far_vertex(edge);
        let target = self.far_vertex(q);
        let f = self.near_face(edge);
        let g = self.far_face(edge);

        let b_to_q = self.edge_wrap(q).offset(WrapRelation::VertToVert);
        let f_to_g = self.edge_wrap(edge).offset(WrapRelation::FaceToFace);
        let both_internal = self.is_internal_face(f) && self.is_internal_face(g);

        self.data_mut(edge).vertex = target;
        self.data_mut(edge).f_next = s;
        self.data_mut(u).f_next = q;
        self.data_mut(q).f_next = twin;
        self.data_mut(q).v_next = u_twin;
        self.data_mut(twin).v_next = q_twin;
        self.data_mut(s).v_next = twin;
        self.data_mut(q_twin).face = g;

        if self.vertex_first_edges[b.index()] == twin {
            self.vertex_first_edges[b.index()] = q;
        }
        if self.face_first_edges[f.index()] == q {
            self.face_first_edges[f.index()] = edge;
        }
        self.vertex_neighbor_counts[b.index()] -= 1;
        self.vertex_neighbor_counts[target.index()] += 1;
        self.face_neighbor_counts[f.index()] -= 1;
        self.face_neighbor_counts[g.index()] += 1;

        let data = self.data_mut(edge);
        data.wrap = data.wrap.modify_target_vert(b_to_q);
        let data = self.data_mut(twin);
        data.wrap = data.wrap.modify_source_vert(b_to_q);
        let f_to_g = if both_internal { f_to_g } else { self.reframe_offset(q, u, g) };
        let data = self.data_mut(q);
        data.wrap = data.wrap.modify_source_face(f_to_g);
        let data = self.data_mut(q_twin);
        data.wrap = data.wrap.modify_target_face(f_to_g);

        log::trace!(
            "pivot backward {:?}: {:?} -> {:?}, {:?} moved from {:?} to {:?}",
            edge,
            b,
            target,
            q,
            f,
            g
        );
    }

    /// Offset from the old near-face frame of `moved` to the frame it takes
    /// in `face`, its new near face. `prev` precedes `moved` in `face` and
    /// must already carry wraps in that frame.
    ///
    /// External faces have no frame of their own: each side borrows the
    /// frame of the internal face across it, so FaceToFace between the old
    /// and new face says nothing useful there. An internal `face` is placed
    /// by chaining from `prev`. An external one takes the frame across
    /// `moved`, which zeroes its FaceToFace.
    fn reframe_offset(&self, moved: HalfEdgeId<I>, prev: HalfEdgeId<I>, face: FaceId<I>) -> WrapOffset {
        let wrap = self.edge_wrap(moved);
        if !self.is_internal_face(face) {
            return wrap.offset(WrapRelation::FaceToFace);
        }
        let framed = self
            .edge_wrap(prev)
            .offset(WrapRelation::FaceToVert)
            .chain(wrap.offset(WrapRelation::VertToVert));
        wrap.offset(WrapRelation::FaceToVert).chain(framed.invert())
    }
}
