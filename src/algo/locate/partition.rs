//! Binary space partition over the edges of an embedded topology.
//!
//! Every node splits space with the plane through one half-edge, oriented so
//! that the near face of the half-edge lies on the under side. Edge segments
//! are clipped against the tree as they are inserted, so each leaf is a convex
//! cell bounded by the segment that created it and answers with the face on
//! its side of that segment.
//!
//! A point that lands on the over side of a face-to-face wrapping half-edge
//! lies outside the fundamental domain. It is folded back by the wrap's
//! offset and the descent restarts from the root.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::topology::{ElementAttribute, FaceId, HalfEdgeId, MeshIndex, Topology, VertexId, WrapRelation};

use super::{Ray, Surface};

/// Options for building and querying a [`FaceLocator`].
#[derive(Debug, Clone)]
pub struct LocatorOptions {
    /// Distance below which a point counts as lying on a splitting plane.
    pub epsilon: f64,
    /// How many times one query may fold a point back across a wrapping edge.
    pub max_wrap_restarts: usize,
    /// Answer batch queries in parallel.
    pub parallel: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            epsilon: 1e-9,
            max_wrap_restarts: 16,
            parallel: false,
        }
    }
}

impl LocatorOptions {
    /// Create options with the specified plane tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon.abs();
        self
    }

    /// Create options with the specified wrap restart budget.
    pub fn with_max_wrap_restarts(mut self, restarts: usize) -> Self {
        self.max_wrap_restarts = restarts;
        self
    }

    /// Set whether batch queries run in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum Child<I: MeshIndex> {
    Node(usize),
    /// Answer with the far face of this half-edge.
    Leaf(HalfEdgeId<I>),
}

#[derive(Debug, Clone)]
struct Node<I: MeshIndex> {
    origin: Point3<f64>,
    normal: Vector3<f64>,
    under: Child<I>,
    over: Child<I>,
}

impl<I: MeshIndex> Node<I> {
    #[inline]
    fn distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&(*point - self.origin))
    }
}

/// Where a fragment is headed during insertion.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Root,
    Under(usize),
    Over(usize),
}

/// A point-to-face locator for a topology embedded on a [`Surface`].
///
/// Building is a one-shot preprocessing step. Queries only read the tree and
/// the topology, so a built locator can be shared between threads.
pub struct FaceLocator<'a, I: MeshIndex, S: Surface> {
    topology: &'a Topology<I>,
    surface: &'a S,
    nodes: Vec<Node<I>>,
    root: Option<usize>,
    options: LocatorOptions,
}

impl<'a, I: MeshIndex, S: Surface> FaceLocator<'a, I, S> {
    /// Build a locator.
    ///
    /// `positions` gives the canonical position of every vertex. Half-edges
    /// are inserted in three passes: interior edges that do not wrap, then
    /// edges that wrap between faces, then outer boundary edges.
    pub fn new<P>(topology: &'a Topology<I>, positions: &P, surface: &'a S, options: LocatorOptions) -> Self
    where
        P: ElementAttribute<VertexId<I>, Point3<f64>> + ?Sized,
    {
        let mut locator = Self {
            topology,
            surface,
            nodes: Vec::with_capacity(topology.num_halfedges()),
            root: None,
            options,
        };

        let mut interior = Vec::new();
        let mut wrapping = Vec::new();
        let mut boundary = Vec::new();
        for he in topology.half_edges() {
            if !he.near_face().is_internal() {
                continue;
            }
            if he.far_face().is_external() {
                boundary.push(he.id());
            } else if !he.wrap().offset(WrapRelation::FaceToFace).is_none() {
                wrapping.push(he.id());
            } else if he.index() < he.twin().index() {
                interior.push(he.id());
            }
        }

        let mut skipped = 0;
        for he in interior.into_iter().chain(wrapping).chain(boundary) {
            if !locator.insert_edge(positions, he) {
                skipped += 1;
            }
        }

        log::debug!(
            "face locator: {} nodes over {} half-edges ({} degenerate skipped)",
            locator.nodes.len(),
            topology.num_halfedges(),
            skipped
        );
        locator
    }

    /// Number of partition nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The options this locator was built with.
    pub fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Find the internal face containing a point.
    ///
    /// Points outside every internal face (past an outer boundary) give `None`.
    /// Points past a wrapping edge are folded back into the fundamental domain
    /// first. If folding does not settle within
    /// [`LocatorOptions::max_wrap_restarts`], the query gives up with `None`.
    pub fn find_face(&self, point: &Point3<f64>) -> Option<FaceId<I>> {
        let root = self.root?;
        let mut point = *point;
        let mut restarts = 0;

        loop {
            let mut child = Child::Node(root);
            let mut over = false;
            let leaf = loop {
                match child {
                    Child::Node(n) => {
                        let node = &self.nodes[n];
                        over = node.distance(&point) > 0.0;
                        child = if over { node.over } else { node.under };
                    }
                    Child::Leaf(he) => break he,
                }
            };

            let wrap = self.topology.edge_wrap(leaf);
            if over && !wrap.offset(WrapRelation::FaceToFace).is_none() {
                restarts += 1;
                if restarts > self.options.max_wrap_restarts {
                    log::warn!(
                        "face locator gave up on {:?} after {} wrap restarts",
                        point,
                        self.options.max_wrap_restarts
                    );
                    return None;
                }
                point = self.surface.reverse_offset_face_to_face_attribute(&point, wrap);
                continue;
            }

            let face = self.topology.far_face(leaf);
            return self.topology.is_internal_face(face).then_some(face);
        }
    }

    /// Find the internal face first hit by a ray.
    ///
    /// `None` if the ray misses the surface or hits it outside every face.
    pub fn find_face_by_ray(&self, ray: &Ray) -> Option<FaceId<I>> {
        let hit = self.surface.intersect(ray)?;
        self.find_face(&hit)
    }

    /// Locate many points at once.
    pub fn find_faces(&self, points: &[Point3<f64>]) -> Vec<Option<FaceId<I>>> {
        if self.options.parallel {
            points.par_iter().map(|p| self.find_face(p)).collect()
        } else {
            points.iter().map(|p| self.find_face(p)).collect()
        }
    }

    /// Insert the segment of one half-edge, seen from its near face.
    ///
    /// Returns `false` if the segment is too short to define a plane.
    fn insert_edge<P>(&mut self, positions: &P, he: HalfEdgeId<I>) -> bool
    where
        P: ElementAttribute<VertexId<I>, Point3<f64>> + ?Sized,
    {
        let topology = self.topology;
        let near = self.surface.offset_attribute(
            &positions.get(topology.near_vertex(he)),
            topology.edge_wrap(topology.f_prev(he)).offset(WrapRelation::FaceToVert),
        );
        let far = self.surface.offset_attribute(
            &positions.get(topology.far_vertex(he)),
            topology.edge_wrap(he).offset(WrapRelation::FaceToVert),
        );

        let direction = far - near;
        let mid = near + direction * 0.5;
        let normal = match self
            .surface
            .normal(&mid)
            .cross(&direction)
            .try_normalize(self.options.epsilon)
        {
            Some(normal) => normal,
            None => return false,
        };

        let mut pending = vec![(Slot::Root, near, far)];
        while let Some((slot, a, b)) = pending.pop() {
            if (b - a).norm() <= self.options.epsilon {
                continue;
            }

            let target = match slot {
                Slot::Root => self.root.map(Child::Node),
                Slot::Under(n) => Some(self.nodes[n].under),
                Slot::Over(n) => Some(self.nodes[n].over),
            };

            if let Some(Child::Node(n)) = target {
                let node = &self.nodes[n];
                let (sa, sb) = (node.distance(&a), node.distance(&b));
                let eps = self.options.epsilon;
                if sa.abs() <= eps && sb.abs() <= eps {
                    // Coplanar with an existing split, so already a cell boundary
                    continue;
                }
                if sa <= eps && sb <= eps {
                    pending.push((Slot::Under(n), a, b));
                } else if sa >= -eps && sb >= -eps {
                    pending.push((Slot::Over(n), a, b));
                } else {
                    let split = a + (b - a) * (sa / (sa - sb));
                    let (under, over) = if sa < 0.0 { (a, b) } else { (b, a) };
                    pending.push((Slot::Under(n), under, split));
                    pending.push((Slot::Over(n), split, over));
                }
                continue;
            }

            let index = self.nodes.len();
            self.nodes.push(Node {
                origin: near,
                normal,
                under: Child::Leaf(topology.twin(he)),
                over: Child::Leaf(he),
            });
            match slot {
                Slot::Root => self.root = Some(index),
                Slot::Under(n) => self.nodes[n].under = Child::Node(index),
                Slot::Over(n) => self.nodes[n].over = Child::Node(index),
            }
        }
        true
    }
}
