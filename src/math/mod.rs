/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Dynamically sized matrix for least-squares systems.
pub type DMatrix = nalgebra::DMatrix<f64>;

/// Dynamically sized column vector.
pub type DVector = nalgebra::DVector<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Projects a raw cross-section vertex onto its working plane.
///
/// Cross-sections are extracted perpendicular to a bone axis and live in the
/// local X-Z plane of the extraction frame, so the planar coordinates are
/// `(x, z)`.
#[must_use]
pub fn project_to_plane(p: &Point3) -> Point2 {
    Point2::new(p.x, p.z)
}
