//! Face-neighbor descriptions shared by the unit tests.

use super::builder::FaceNeighborIndexer;
use super::wrap::{EdgeWrap, WrapOffset, WrapRelation};

/// A rectangular grid of quads, optionally periodic along either axis.
///
/// Face `(i, j)` has index `j * width + i` and corners `(i, j)`, `(i, j + 1)`,
/// `(i + 1, j + 1)`, `(i + 1, j)`, which is clockwise seen from `+z` with
/// axis 0 along `x` and axis 1 along `y`.
#[derive(Debug, Clone, Copy)]
pub struct QuadGrid {
    pub width: usize,
    pub height: usize,
    pub wrap0: bool,
    pub wrap1: bool,
}

/// An open grid of `width * height` quads.
pub fn quad_grid(width: usize, height: usize) -> QuadGrid {
    QuadGrid {
        width,
        height,
        wrap0: false,
        wrap1: false,
    }
}

/// A grid periodic along axis 0.
pub fn cylinder_quad_grid(width: usize, height: usize) -> QuadGrid {
    QuadGrid {
        wrap0: true,
        ..quad_grid(width, height)
    }
}

/// A grid periodic along both axes.
pub fn wrapped_quad_grid(width: usize, height: usize) -> QuadGrid {
    QuadGrid {
        wrap0: true,
        wrap1: true,
        ..quad_grid(width, height)
    }
}

impl QuadGrid {
    /// Number of vertex columns.
    pub fn columns(&self) -> usize {
        if self.wrap0 {
            self.width
        } else {
            self.width + 1
        }
    }

    /// Number of vertex rows.
    pub fn rows(&self) -> usize {
        if self.wrap1 {
            self.height
        } else {
            self.height + 1
        }
    }

    /// Index of the vertex at grid coordinates `(i, j)`, folded onto the tile.
    pub fn vertex(&self, i: usize, j: usize) -> usize {
        (j % self.rows()) * self.columns() + (i % self.columns())
    }

    /// Index of face `(i, j)`.
    pub fn face(&self, i: usize, j: usize) -> usize {
        j * self.width + i
    }

    fn corner(&self, face: usize, neighbor: usize) -> (usize, usize) {
        let (i, j) = (face % self.width, face / self.width);
        match neighbor {
            0 => (i, j),
            1 => (i, j + 1),
            2 => (i + 1, j + 1),
            _ => (i + 1, j),
        }
    }
}

impl FaceNeighborIndexer for QuadGrid {
    fn vertex_count(&self) -> usize {
        self.columns() * self.rows()
    }

    fn edge_count(&self) -> usize {
        self.width * self.rows() + self.columns() * self.height
    }

    fn internal_face_count(&self) -> usize {
        self.width * self.height
    }

    fn external_face_count(&self) -> usize {
        match (self.wrap0, self.wrap1) {
            (true, true) => 0,
            (false, false) => 1,
            _ => 2,
        }
    }

    fn neighbor_count(&self, _face: usize) -> usize {
        4
    }

    fn neighbor_vertex_index(&self, face: usize, neighbor: usize) -> usize {
        let (i, j) = self.corner(face, neighbor);
        self.vertex(i, j)
    }

    fn edge_wrap(&self, face: usize, neighbor: usize) -> EdgeWrap {
        let (i, j) = self.corner(face, neighbor);
        let axis0 = i32::from(self.wrap0 && i == self.width);
        let axis1 = i32::from(self.wrap1 && j == self.height);
        EdgeWrap::from_offset(WrapRelation::FaceToVert, WrapOffset::from_steps(axis0, axis1))
    }
}

/// Explicit face lists, for malformed and irregular inputs.
#[derive(Debug, Clone)]
pub struct FaceList {
    vertex_count: usize,
    edge_count: usize,
    external_face_count: usize,
    faces: Vec<Vec<usize>>,
}

impl FaceList {
    pub fn new(vertex_count: usize, faces: Vec<Vec<usize>>) -> Self {
        Self {
            vertex_count,
            edge_count: 0,
            external_face_count: 1,
            faces,
        }
    }

    pub fn with_edge_count(mut self, edge_count: usize) -> Self {
        self.edge_count = edge_count;
        self
    }

    pub fn with_external_face_count(mut self, count: usize) -> Self {
        self.external_face_count = count;
        self
    }
}

impl FaceNeighborIndexer for FaceList {
    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn internal_face_count(&self) -> usize {
        self.faces.len()
    }

    fn external_face_count(&self) -> usize {
        self.external_face_count
    }

    fn neighbor_count(&self, face: usize) -> usize {
        self.faces[face].len()
    }

    fn neighbor_vertex_index(&self, face: usize, neighbor: usize) -> usize {
        self.faces[face][neighbor]
    }
}
