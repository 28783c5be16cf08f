use crate::error::{GeometryError, Result};
use crate::geometry::polyline::{
    compute_angles, compute_center, compute_curvatures, compute_d_bar, compute_normals,
    compute_tangents,
};
use crate::math::{project_to_plane, Point2, Point3, Vector2};

/// An ordered closed cross-section curve with its derived geometry.
///
/// Vertices are closed (last connects to first) and index order is traversal
/// order around the center. The planar projection, center, angle table,
/// tangents, normals, curvatures and radial baseline are computed once at
/// load and are read-only afterwards; fits never mutate them.
#[derive(Debug, Clone)]
pub struct CurveSample {
    vertices: Vec<Point3>,
    planar: Vec<Point2>,
    center: Point2,
    angles: Vec<f64>,
    tangents: Vec<Vector2>,
    normals: Vec<Vector2>,
    curvatures: Vec<f64>,
    d_bar: Vec<f64>,
}

impl CurveSample {
    /// Builds a sample from raw vertices in load order.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewVertices` for fewer than 3 vertices,
    /// or any geometry error raised while deriving the angle table.
    pub fn from_vertices(vertices: Vec<Point3>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices {
                needed: 3,
                got: vertices.len(),
            }
            .into());
        }
        let planar: Vec<Point2> = vertices.iter().map(project_to_plane).collect();
        let center = compute_center(&planar)?;
        let angles = compute_angles(&planar, center)?;
        let tangents = compute_tangents(&planar, &angles);
        let normals = compute_normals(&tangents);
        let curvatures = compute_curvatures(&tangents, &angles);
        let d_bar = compute_d_bar(&planar, center);
        Ok(Self {
            vertices,
            planar,
            center,
            angles,
            tangents,
            normals,
            curvatures,
            d_bar,
        })
    }

    /// Number of vertices on the closed curve.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false: construction enforces at least 3 vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Raw 3D vertices in load order.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Planar projections of the vertices, in the same order.
    #[must_use]
    pub fn planar(&self) -> &[Point2] {
        &self.planar
    }

    /// Centroid of the planar projection.
    #[must_use]
    pub fn center(&self) -> Point2 {
        self.center
    }

    /// Unwrapped polar angle per vertex, monotone in traversal order.
    #[must_use]
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// In-plane tangent direction per vertex (unnormalized).
    #[must_use]
    pub fn tangents(&self) -> &[Vector2] {
        &self.tangents
    }

    /// In-plane normal direction per vertex (unnormalized).
    #[must_use]
    pub fn normals(&self) -> &[Vector2] {
        &self.normals
    }

    /// Diagnostic curvature per vertex.
    #[must_use]
    pub fn curvatures(&self) -> &[f64] {
        &self.curvatures
    }

    /// Per-vertex radial baseline used to normalize Ea/Em.
    #[must_use]
    pub fn d_bar(&self) -> &[f64] {
        &self.d_bar
    }
}
