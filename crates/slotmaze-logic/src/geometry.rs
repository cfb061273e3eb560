//! Floor-plane geometry: polygons and point containment.
//!
//! Pure functions over plain data. The maze boundary, platform footprints and
//! puzzle triggers are all [`Polygon`]s on the horizontal (X, Z) plane; a 3D
//! position is projected with [`floor_point`] before testing.
//!
//! # Boundary convention
//!
//! Containment uses the even-odd rule with a half-open edge span, so a point
//! lying exactly on the boundary is classified consistently: for an
//! axis-aligned rectangle, the min-x and min-y edges are inside and the max-x
//! and max-y edges are outside.
//!
//! ```
//! use glam::Vec2;
//! use slotmaze_logic::geometry::Polygon;
//!
//! let square = Polygon::new(vec![
//!     Vec2::new(0.0, 0.0),
//!     Vec2::new(10.0, 0.0),
//!     Vec2::new(10.0, 10.0),
//!     Vec2::new(0.0, 10.0),
//! ])
//! .unwrap();
//! assert!(square.contains(Vec2::new(5.0, 5.0)));
//! assert!(!square.contains(Vec2::new(15.0, 5.0)));
//! assert!(square.contains(Vec2::new(0.0, 5.0)));
//! assert!(!square.contains(Vec2::new(10.0, 5.0)));
//! ```

use std::fmt;

use glam::{Vec2, Vec3};

/// A 2D coordinate on the floor plane.
pub type Point2D = Vec2;

/// Why a vertex list cannot be used as a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFault {
    /// Fewer than three vertices.
    TooFewVertices,
    /// The edge starting at this vertex index has zero length.
    ZeroLengthEdge(usize),
}

/// A geometry precondition violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    InvalidGeometry {
        vertices: usize,
        fault: GeometryFault,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InvalidGeometry { vertices, fault } => match fault {
                GeometryFault::TooFewVertices => write!(
                    f,
                    "invalid geometry: polygon has {} vertices, at least 3 required",
                    vertices
                ),
                GeometryFault::ZeroLengthEdge(i) => write!(
                    f,
                    "invalid geometry: edge {} of {}-vertex polygon has zero length",
                    i, vertices
                ),
            },
        }
    }
}

impl std::error::Error for GeometryError {}

/// Project a 3D position onto the floor plane: `(x, z)`.
pub fn floor_point(position: Vec3) -> Point2D {
    Vec2::new(position.x, position.z)
}

/// Check that a vertex list describes a usable polygon.
pub fn validate_vertices(vertices: &[Point2D]) -> Result<(), GeometryError> {
    let n = vertices.len();
    if n < 3 {
        return Err(GeometryError::InvalidGeometry {
            vertices: n,
            fault: GeometryFault::TooFewVertices,
        });
    }
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        if a == b {
            return Err(GeometryError::InvalidGeometry {
                vertices: n,
                fault: GeometryFault::ZeroLengthEdge(i),
            });
        }
    }
    Ok(())
}

/// Even-odd containment over a raw vertex list.
///
/// Validates the vertices first; use [`Polygon::contains`] on hot paths.
pub fn contains(vertices: &[Point2D], point: Point2D) -> Result<bool, GeometryError> {
    validate_vertices(vertices)?;
    Ok(crossings_odd(vertices, point))
}

/// Cast a ray toward +x and count edge crossings.
fn crossings_odd(vertices: &[Point2D], p: Point2D) -> bool {
    let n = vertices.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[j];
        // Half-open span: a vertex exactly on the ray belongs to one edge only,
        // and horizontal edges never qualify.
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// A closed, validated polygon on the floor plane.
///
/// The closing edge from the last vertex back to the first is implicit.
/// Winding order is not constrained.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point2D>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point2D>) -> Result<Self, GeometryError> {
        validate_vertices(&vertices)?;
        Ok(Self { vertices })
    }

    /// Axis-aligned rectangle centred on `center` with the given half-extents.
    pub fn rect(center: Point2D, half_w: f32, half_h: f32) -> Result<Self, GeometryError> {
        Self::new(vec![
            Vec2::new(center.x - half_w, center.y - half_h),
            Vec2::new(center.x + half_w, center.y - half_h),
            Vec2::new(center.x + half_w, center.y + half_h),
            Vec2::new(center.x - half_w, center.y + half_h),
        ])
    }

    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    /// Even-odd containment test (see module docs for the boundary rule).
    pub fn contains(&self, point: Point2D) -> bool {
        crossings_odd(&self.vertices, point)
    }

    /// Containment of a 3D position, using its floor projection.
    pub fn contains_position(&self, position: Vec3) -> bool {
        self.contains(floor_point(position))
    }

    /// Average of the vertices. Used as a platform's defining point.
    pub fn centroid(&self) -> Point2D {
        let sum: Vec2 = self.vertices.iter().copied().sum();
        sum / self.vertices.len() as f32
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounds(&self) -> (Point2D, Point2D) {
        let first = self.vertices[0];
        self.vertices
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Same polygon with the opposite winding.
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Self { vertices }
    }
}

impl From<Polygon> for Vec<Point2D> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}
