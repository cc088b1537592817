//! Point and ray location on an embedded topology.
//!
//! A [`FaceLocator`] answers "which face contains this point?" for a topology
//! embedded on a [`Surface`]. Vertex positions are supplied through an
//! [`ElementAttribute`](crate::topology::ElementAttribute); the surface
//! supplies normals, ray intersection and the periodic offsets needed to fold
//! points back into the fundamental domain when a query crosses a wrapping
//! edge.
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
//! use wrapmesh::nalgebra::Point3;
//!
//! // The unit square split along its diagonal from 0 to 2
//! let topology: Topology = build_topology(&Square).unwrap();
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let surface = PlanarSurface::xy(1.0, 1.0);
//! let locator = FaceLocator::new(&topology, &positions, &surface, LocatorOptions::default());
//!
//! assert_eq!(locator.find_face(&Point3::new(0.75, 0.25, 0.0)), Some(FaceId::new(0)));
//! assert_eq!(locator.find_face(&Point3::new(0.25, 0.75, 0.0)), Some(FaceId::new(1)));
//! ```

mod partition;

pub use partition::{FaceLocator, LocatorOptions};

use nalgebra::{Point3, Vector3};

use crate::topology::{EdgeWrap, WrapOffset, WrapRelation};

/// A half-line in space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start of the ray.
    pub origin: Point3<f64>,
    /// Direction of travel. Need not be normalized.
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Create a ray.
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    /// The point at parameter `t`.
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// The geometric surface a topology is embedded on.
///
/// Face rings must run clockwise when seen from the side [`Surface::normal`]
/// points to.
pub trait Surface: Sync {
    /// Outward unit normal at a position on the surface.
    fn normal(&self, position: &Point3<f64>) -> Vector3<f64>;

    /// First point where a ray meets the surface, if any.
    fn intersect(&self, ray: &Ray) -> Option<Point3<f64>>;

    /// Move a position by a periodic offset.
    ///
    /// Seeing a canonical position from a frame that is `offset` away.
    fn offset_attribute(&self, position: &Point3<f64>, offset: WrapOffset) -> Point3<f64>;

    /// Undo [`Surface::offset_attribute`].
    fn reverse_offset_attribute(&self, position: &Point3<f64>, offset: WrapOffset) -> Point3<f64> {
        self.offset_attribute(position, offset.invert())
    }

    /// Undo the vertex-to-vertex offset of a wrap.
    fn reverse_offset_vert_to_vert_attribute(&self, position: &Point3<f64>, wrap: EdgeWrap) -> Point3<f64> {
        self.reverse_offset_attribute(position, wrap.offset(WrapRelation::VertToVert))
    }

    /// Undo the vertex-to-edge offset of a wrap.
    fn reverse_offset_vert_to_edge_attribute(&self, position: &Point3<f64>, wrap: EdgeWrap) -> Point3<f64> {
        self.reverse_offset_attribute(position, wrap.offset(WrapRelation::VertToEdge))
    }

    /// Undo the vertex-to-face offset of a wrap.
    fn reverse_offset_vert_to_face_attribute(&self, position: &Point3<f64>, wrap: EdgeWrap) -> Point3<f64> {
        self.reverse_offset_attribute(position, wrap.offset(WrapRelation::VertToFace))
    }

    /// Undo the edge-to-vertex offset of a wrap.
    fn reverse_offset_edge_to_vert_attribute(&self, position: &Point3<f64>, wrap: EdgeWrap) -> Point3<f64> {
        self.reverse_offset_attribute(position, wrap.offset(WrapRelation::EdgeToVert))
    }

    /// Undo the edge-to-face offset of a wrap.
    fn reverse_offset_edge_to_face_attribute(&self, position: &Point3<f64>, wrap: EdgeWrap) -> Point3<f64> {
        self.reverse_offset_attribute(position, wrap.offset(WrapRelation::EdgeToFace))
    }

    /// Undo the face-to-vertex offset of a wrap.
    fn reverse_offset_face_to_vert_attribute(&self, position: &Point3<f64>, wrap: EdgeWrap) -> Point3<f64> {
        self.reverse_offset_attribute(position, wrap.offset(WrapRelation::FaceToVert))
    }

    /// Undo the face-to-edge offset of a wrap.
    fn reverse_offset_face_to_edge_attribute(&self, position: &Point3<f64>, wrap: EdgeWrap) -> Point3<f64> {
        self.reverse_offset_attribute(position, wrap.offset(WrapRelation::FaceToEdge))
    }

    /// Undo the face-to-face offset of a wrap.
    fn reverse_offset_face_to_face_attribute(&self, position: &Point3<f64>, wrap: EdgeWrap) -> Point3<f64> {
        self.reverse_offset_attribute(position, wrap.offset(WrapRelation::FaceToFace))
    }
}

/// A flat surface, optionally periodic along two in-plane axes.
///
/// `axis0` and `axis1` are the period vectors. A positive step along axis 0
/// moves a position by `axis0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarSurface {
    /// A point on the plane.
    pub origin: Point3<f64>,
    /// Unit normal of the plane.
    pub normal: Vector3<f64>,
    /// Period along axis 0.
    pub axis0: Vector3<f64>,
    /// Period along axis 1.
    pub axis1: Vector3<f64>,
}

impl PlanarSurface {
    /// Create a planar surface. The normal is normalized.
    pub fn new(origin: Point3<f64>, normal: Vector3<f64>, axis0: Vector3<f64>, axis1: Vector3<f64>) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
            axis0,
            axis1,
        }
    }

    /// The `z = 0` plane facing `+z`, with the given periods along `x` and `y`.
    pub fn xy(period_x: f64, period_y: f64) -> Self {
        Self::new(
            Point3::origin(),
            Vector3::z(),
            Vector3::new(period_x, 0.0, 0.0),
            Vector3::new(0.0, period_y, 0.0),
        )
    }
}

impl Surface for PlanarSurface {
    fn normal(&self, _position: &Point3<f64>) -> Vector3<f64> {
        self.normal
    }

    fn intersect(&self, ray: &Ray) -> Option<Point3<f64>> {
        let denom = self.normal.dot(&ray.direction);
        if denom.abs() < 1e-12 {
            return None;
        }
        let t = self.normal.dot(&(self.origin - ray.origin)) / denom;
        (t >= 0.0).then(|| ray.at(t))
    }

    fn offset_attribute(&self, position: &Point3<f64>, offset: WrapOffset) -> Point3<f64> {
        *position + self.axis0 * f64::from(offset.axis0()) + self.axis1 * f64::from(offset.axis1())
    }
}
