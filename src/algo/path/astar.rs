//! A* search over topology graphs.
//!
//! The vertex graph has one node per vertex and one edge per half-edge. The
//! face graph has one node per internal face; half-edges leading into an
//! external face are never crossed.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::error::{Result, TopologyError};
use crate::topology::{
    Face, FaceEdge, FaceEdges, FaceId, HalfEdgeId, MeshIndex, Topology, Vertex, VertexEdge,
    VertexEdges, VertexId,
};

use super::Path;

/// A graph view of a topology that the search can walk.
trait SearchSpace<I: MeshIndex> {
    type Node: Copy;
    type Edge: Copy;
    type Edges: Iterator<Item = Self::Edge>;

    fn node(&self, index: usize) -> Self::Node;

    fn edges(&self, index: usize) -> Self::Edges;

    /// The node an edge leads to, if it may be entered.
    fn enter(&self, edge: Self::Edge) -> Option<usize>;

    /// The node a half-edge leaves.
    fn leave(&self, edge: HalfEdgeId<I>) -> usize;

    fn half_edge(&self, edge: Self::Edge) -> HalfEdgeId<I>;
}

struct VertexGraph<'a, I: MeshIndex> {
    topology: &'a Topology<I>,
}

impl<'a, I: MeshIndex> SearchSpace<I> for VertexGraph<'a, I> {
    type Node = Vertex<'a, I>;
    type Edge = VertexEdge<'a, I>;
    type Edges = VertexEdges<'a, I>;

    fn node(&self, index: usize) -> Self::Node {
        self.topology.vertex(VertexId::new(index))
    }

    fn edges(&self, index: usize) -> Self::Edges {
        self.node(index).edges()
    }

    fn enter(&self, edge: Self::Edge) -> Option<usize> {
        Some(edge.far_vertex().index())
    }

    fn leave(&self, edge: HalfEdgeId<I>) -> usize {
        self.topology.near_vertex(edge).index()
    }

    fn half_edge(&self, edge: Self::Edge) -> HalfEdgeId<I> {
        edge.id()
    }
}

struct FaceGraph<'a, I: MeshIndex> {
    topology: &'a Topology<I>,
}

impl<'a, I: MeshIndex> SearchSpace<I> for FaceGraph<'a, I> {
    type Node = Face<'a, I>;
    type Edge = FaceEdge<'a, I>;
    type Edges = FaceEdges<'a, I>;

    fn node(&self, index: usize) -> Self::Node {
        self.topology.face(FaceId::new(index))
    }

    fn edges(&self, index: usize) -> Self::Edges {
        self.node(index).edges()
    }

    fn enter(&self, edge: Self::Edge) -> Option<usize> {
        let far = edge.far_face();
        far.is_internal().then(|| far.index())
    }

    fn leave(&self, edge: HalfEdgeId<I>) -> usize {
        self.topology.near_face(edge).index()
    }

    fn half_edge(&self, edge: Self::Edge) -> HalfEdgeId<I> {
        edge.id()
    }
}

/// Best known way into a node that is still open.
#[derive(Debug, Clone, Copy)]
struct OpenNode<I: MeshIndex> {
    cost: f64,
    length: usize,
    edge: Option<HalfEdgeId<I>>,
}

/// Entry in the A* priority queue.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    node: usize,
    /// Cost so far plus heuristic.
    estimate: f64,
    cost: f64,
    length: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on the estimate; among equal estimates the longer path
        // is closer to the target.
        other
            .estimate
            .partial_cmp(&self.estimate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.length.cmp(&other.length))
    }
}

/// Reusable A* search state.
///
/// The queue and node maps are cleared, not reallocated, between searches.
/// A finder is therefore not reentrant: concurrent searches need separate
/// finders, which may share the same topology.
#[derive(Debug, Default)]
pub struct PathFinder<I: MeshIndex = u32> {
    queue: BinaryHeap<QueueEntry>,
    open: HashMap<usize, OpenNode<I>>,
    closed: HashMap<usize, Option<HalfEdgeId<I>>>,
}

impl<I: MeshIndex> PathFinder<I> {
    /// Create a finder with empty search state.
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            open: HashMap::new(),
            closed: HashMap::new(),
        }
    }

    /// Create a finder sized for searches touching about `nodes` nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            queue: BinaryHeap::with_capacity(nodes),
            open: HashMap::with_capacity(nodes),
            closed: HashMap::with_capacity(nodes),
        }
    }

    /// Find a cheapest path between two vertices.
    ///
    /// `heuristic(vertex, target, length)` estimates the remaining cost from a
    /// vertex reached after `length` edges; it must not overestimate for the
    /// result to be optimal. `cost(edge, length)` is the cost of taking `edge`
    /// after `length` edges. An infinite cost makes the edge impassable.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IndexOutOfRange`] if either vertex is out of
    /// range. An unreachable target is reported through [`Path::is_complete`].
    pub fn find_vertex_path<'a, H, C>(
        &mut self,
        topology: &'a Topology<I>,
        source: VertexId<I>,
        target: VertexId<I>,
        heuristic: H,
        cost: C,
    ) -> Result<Path<VertexId<I>, I>>
    where
        H: Fn(Vertex<'a, I>, Vertex<'a, I>, usize) -> f64,
        C: Fn(VertexEdge<'a, I>, usize) -> f64,
    {
        topology.check_vertex(source)?;
        topology.check_vertex(target)?;

        let graph = VertexGraph { topology };
        Ok(match self.search(&graph, source.index(), target.index(), heuristic, cost) {
            Some((edges, total)) => Path::new(source, target, edges, total),
            None => Path::unreachable(source, target),
        })
    }

    /// Find a cheapest path between two internal faces.
    ///
    /// See [`PathFinder::find_vertex_path`] for the meaning of `heuristic` and
    /// `cost`. Edges into external faces are never taken.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::IndexOutOfRange`] if either face is not an
    /// internal face.
    pub fn find_face_path<'a, H, C>(
        &mut self,
        topology: &'a Topology<I>,
        source: FaceId<I>,
        target: FaceId<I>,
        heuristic: H,
        cost: C,
    ) -> Result<Path<FaceId<I>, I>>
    where
        H: Fn(Face<'a, I>, Face<'a, I>, usize) -> f64,
        C: Fn(FaceEdge<'a, I>, usize) -> f64,
    {
        for face in [source, target] {
            if !topology.is_internal_face(face) {
                return Err(TopologyError::IndexOutOfRange {
                    kind: "internal face",
                    index: face.index(),
                    len: topology.num_internal_faces(),
                });
            }
        }

        let graph = FaceGraph { topology };
        Ok(match self.search(&graph, source.index(), target.index(), heuristic, cost) {
            Some((edges, total)) => Path::new(source, target, edges, total),
            None => Path::unreachable(source, target),
        })
    }

    fn clear(&mut self) {
        self.queue.clear();
        self.open.clear();
        self.closed.clear();
    }

    fn search<G, H, C>(
        &mut self,
        graph: &G,
        source: usize,
        target: usize,
        heuristic: H,
        cost: C,
    ) -> Option<(Vec<HalfEdgeId<I>>, f64)>
    where
        G: SearchSpace<I>,
        H: Fn(G::Node, G::Node, usize) -> f64,
        C: Fn(G::Edge, usize) -> f64,
    {
        self.clear();
        if source == target {
            return Some((Vec::new(), 0.0));
        }

        let goal = graph.node(target);
        self.open.insert(
            source,
            OpenNode {
                cost: 0.0,
                length: 0,
                edge: None,
            },
        );
        self.queue.push(QueueEntry {
            node: source,
            estimate: heuristic(graph.node(source), goal, 0),
            cost: 0.0,
            length: 0,
        });

        while let Some(entry) = self.queue.pop() {
            // Skip entries superseded by a cheaper way in
            let current = match self.open.get(&entry.node) {
                Some(open) if open.cost == entry.cost && open.length == entry.length => *open,
                _ => continue,
            };
            self.open.remove(&entry.node);
            self.closed.insert(entry.node, current.edge);

            if entry.node == target {
                let edges = self.reconstruct(graph, target);
                log::debug!(
                    "path {} -> {}: {} edges, cost {}, {} nodes closed",
                    source,
                    target,
                    edges.len(),
                    current.cost,
                    self.closed.len()
                );
                return Some((edges, current.cost));
            }

            for edge in graph.edges(entry.node) {
                let next = match graph.enter(edge) {
                    Some(next) if !self.closed.contains_key(&next) => next,
                    _ => continue,
                };
                let step = cost(edge, current.length);
                // Infinite or NaN costs block the edge
                if !step.is_finite() {
                    continue;
                }

                let total = current.cost + step;
                let length = current.length + 1;
                if self.open.get(&next).map_or(true, |open| total < open.cost) {
                    self.open.insert(
                        next,
                        OpenNode {
                            cost: total,
                            length,
                            edge: Some(graph.half_edge(edge)),
                        },
                    );
                    self.queue.push(QueueEntry {
                        node: next,
                        estimate: total + heuristic(graph.node(next), goal, length),
                        cost: total,
                        length,
                    });
                }
            }
        }

        log::debug!(
            "path {} -> {}: unreachable after closing {} nodes",
            source,
            target,
            self.closed.len()
        );
        None
    }

    fn reconstruct<G: SearchSpace<I>>(&self, graph: &G, target: usize) -> Vec<HalfEdgeId<I>> {
        let mut edges = Vec::new();
        let mut node = target;
        while let Some(&Some(edge)) = self.closed.get(&node) {
            edges.push(edge);
            node = graph.leave(edge);
            if edges.len() > self.closed.len() {
                break;
            }
        }
        edges.reverse();
        edges
    }
}
