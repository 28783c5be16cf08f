//! Geometry derived from an ordered closed cross-section polyline.
//!
//! All functions operate on the planar projection of the curve. Index order
//! is traversal order around the closed loop and is semantically meaningful:
//! the angle table is unwrapped along it.

use std::f64::consts::{PI, TAU};

use crate::error::{GeometryError, Result};
use crate::math::{Point2, Vector2, TOLERANCE};

/// Computes the centroid of a vertex set (arithmetic mean).
///
/// Order-independent: any permutation of `planar` yields the same center.
///
/// # Errors
///
/// Returns `GeometryError::TooFewVertices` for an empty vertex set.
pub fn compute_center(planar: &[Point2]) -> Result<Point2> {
    if planar.is_empty() {
        return Err(GeometryError::TooFewVertices { needed: 1, got: 0 }.into());
    }
    let mut sum = Vector2::zeros();
    for p in planar {
        sum += p.coords;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = planar.len() as f64;
    Ok(Point2::from(sum / count))
}

/// Computes the polar angle of every vertex relative to `center`, unwrapped
/// so the sequence is monotonically non-decreasing in traversal order.
///
/// The first angle lies in `[0, 2π)`; later angles may exceed `2π` once the
/// traversal passes the branch cut. Branch cuts between consecutive vertices
/// are resolved by the shortest signed wrap, so the 0/2π seam follows
/// traversal order rather than raw `atan2` values.
///
/// # Errors
///
/// - `GeometryError::TooFewVertices` if the curve has fewer than 3 vertices.
/// - `GeometryError::Degenerate` if a vertex coincides with the center or
///   the curve winds more than one revolution.
/// - `GeometryError::NonMonotonicAngles` if a vertex steps backwards in
///   angle, so no monotone traversal order exists.
pub fn compute_angles(planar: &[Point2], center: Point2) -> Result<Vec<f64>> {
    let n = planar.len();
    if n < 3 {
        return Err(GeometryError::TooFewVertices { needed: 3, got: n }.into());
    }

    let mut raw = Vec::with_capacity(n);
    for (i, p) in planar.iter().enumerate() {
        let v = p - center;
        if v.norm() < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "vertex {i} coincides with the curve center"
            ))
            .into());
        }
        let mut a = v.y.atan2(v.x);
        if a < 0.0 {
            a += TAU;
        }
        raw.push(a);
    }

    let mut angles = Vec::with_capacity(n);
    angles.push(raw[0]);
    for i in 1..n {
        let delta = wrap_to_signed(raw[i] - raw[i - 1]);
        if delta < -TOLERANCE {
            return Err(GeometryError::NonMonotonicAngles { index: i }.into());
        }
        angles.push(angles[i - 1] + delta.max(0.0));
    }

    if angles[n - 1] - angles[0] >= TAU {
        return Err(
            GeometryError::Degenerate("curve winds more than one revolution".into()).into(),
        );
    }
    let closing = wrap_to_signed(raw[0] - raw[n - 1]);
    if closing < -TOLERANCE {
        return Err(GeometryError::NonMonotonicAngles { index: 0 }.into());
    }

    Ok(angles)
}

/// Computes the tangent at every vertex as the central finite difference of
/// planar position with respect to the polar angle.
///
/// Direction only; consumers normalize. When the angular step on either
/// side of the vertex vanishes, the raw chord between the neighbors is
/// returned instead. The steps are checked one side at a time: the seam
/// lift alone must not stand in for a real angular extent.
#[must_use]
pub fn compute_tangents(planar: &[Point2], angles: &[f64]) -> Vec<Vector2> {
    let n = planar.len();
    let mut tangents = Vec::with_capacity(n);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        let next = (i + 1) % n;
        let chord = planar[next] - planar[prev];
        let forward = cyclic_angle(angles, i as isize + 1) - angles[i];
        let backward = angles[i] - cyclic_angle(angles, i as isize - 1);
        if forward > TOLERANCE && backward > TOLERANCE {
            tangents.push(chord / (forward + backward));
        } else {
            tangents.push(chord);
        }
    }
    tangents
}

/// Rotates every tangent by +90 degrees within the working plane.
#[must_use]
pub fn compute_normals(tangents: &[Vector2]) -> Vec<Vector2> {
    tangents.iter().map(|t| Vector2::new(-t.y, t.x)).collect()
}

/// Computes the curvature at every vertex as the rate of tangent-direction
/// change per unit polar angle (central difference).
///
/// Diagnostic only, used to rank cut-point candidates. A near-zero angular
/// step on either side of the vertex yields a curvature of 0 rather than
/// blowing up; as with tangents, each side is checked before the seam lift
/// is applied, so a degenerate angle table never reads as a full turn.
#[must_use]
pub fn compute_curvatures(tangents: &[Vector2], angles: &[f64]) -> Vec<f64> {
    let n = tangents.len();
    let mut curvatures = Vec::with_capacity(n);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        let next = (i + 1) % n;
        let phi_prev = tangents[prev].y.atan2(tangents[prev].x);
        let phi_next = tangents[next].y.atan2(tangents[next].x);
        let dphi = wrap_to_signed(phi_next - phi_prev);
        let forward = cyclic_angle(angles, i as isize + 1) - angles[i];
        let backward = angles[i] - cyclic_angle(angles, i as isize - 1);
        if forward < TOLERANCE || backward < TOLERANCE {
            curvatures.push(0.0);
        } else {
            curvatures.push(dphi / (forward + backward));
        }
    }
    curvatures
}

/// Computes the per-vertex radial baseline used to normalize error metrics.
///
/// Must be derived from the same vertex set and center later used for error
/// comparison, so Ea/Em stay dimensionless and comparable across
/// segmentations.
#[must_use]
pub fn compute_d_bar(planar: &[Point2], center: Point2) -> Vec<f64> {
    planar.iter().map(|p| (p - center).norm()).collect()
}

/// Wraps an angle difference into `(-π, π]`.
fn wrap_to_signed(mut delta: f64) -> f64 {
    while delta > PI {
        delta -= TAU;
    }
    while delta <= -PI {
        delta += TAU;
    }
    delta
}

/// Reads the unwrapped angle table cyclically: indices past either end are
/// lifted by a full revolution so differences stay monotone across the seam.
fn cyclic_angle(angles: &[f64], index: isize) -> f64 {
    let n = angles.len() as isize;
    if index < 0 {
        angles[(index + n) as usize] - TAU
    } else if index >= n {
        angles[(index - n) as usize] + TAU
    } else {
        angles[index as usize]
    }
}
