//! Least-squares fit of the generalized-ellipse harmonic model.
//!
//! The radial profile of a segment is modeled as
//! `r(θ) = baseline + Σ_{k=1..J} a_k cos(kθ) + b_k sin(kθ)`,
//! where `baseline` is the mean segment radius and the coefficients describe
//! the radial deviation from it. A perfect circle therefore fits with all
//! coefficients zero at any order.

use crate::error::{FitError, Result};
use crate::math::{DMatrix, DVector, Point2, Vector2};

/// A fitted harmonic radial model for one segment.
///
/// Derived data: recomputed whenever the order or the input segment changes,
/// never mutated in place.
#[derive(Debug, Clone)]
pub struct HarmonicModel {
    baseline: f64,
    a: Vec<f64>,
    b: Vec<f64>,
}

impl HarmonicModel {
    /// Harmonic order J of the model.
    #[must_use]
    pub fn order(&self) -> usize {
        self.a.len()
    }

    /// Cosine amplitudes `a[1..=J]` in harmonic-index order.
    #[must_use]
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    /// Sine amplitudes `b[1..=J]` in harmonic-index order.
    #[must_use]
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Mean segment radius the deviations are measured against.
    #[must_use]
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Radial deviation from the baseline at angle `theta`.
    #[must_use]
    pub fn deviation(&self, theta: f64) -> f64 {
        let mut sum = 0.0;
        for (k, (a, b)) in self.a.iter().zip(&self.b).enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let freq = (k + 1) as f64;
            sum += a * (freq * theta).cos() + b * (freq * theta).sin();
        }
        sum
    }

    /// Radius at angle `theta`.
    #[must_use]
    pub fn radius(&self, theta: f64) -> f64 {
        self.baseline + self.deviation(theta)
    }

    /// Fitted point at angle `theta`, reconstructed along the ray from
    /// `center`. `center` must be the origin the fit measured radii and
    /// angles against; mixing origins skews every reconstructed vertex.
    #[must_use]
    pub fn point_at(&self, center: Point2, theta: f64) -> Point2 {
        center + self.radius(theta) * Vector2::new(theta.cos(), theta.sin())
    }

    /// Derives the model of the mirrored half of a bilaterally symmetric
    /// curve, with the mirrored half's own `baseline`.
    ///
    /// Reflection across the symmetry axis maps θ to −θ, under which
    /// `cos(kθ)` is even and `sin(kθ)` is odd, so the mirrored coefficients
    /// are `a' = a`, `b' = −b`. This is an algebraic identity
    /// (`mirrored.radius(2π − θ) == self.radius(θ)` exactly), not a re-fit,
    /// so the shared boundary points match by construction.
    #[must_use]
    pub fn mirrored(&self, baseline: f64) -> Self {
        Self {
            baseline,
            a: self.a.clone(),
            b: self.b.iter().map(|b| -b).collect(),
        }
    }
}

/// Mean radius of a vertex set about `center`.
#[must_use]
pub fn mean_radius(planar: &[Point2], center: Point2) -> f64 {
    if planar.is_empty() {
        return 0.0;
    }
    let sum: f64 = planar.iter().map(|p| (p - center).norm()).sum();
    #[allow(clippy::cast_precision_loss)]
    let count = planar.len() as f64;
    sum / count
}

/// Fits harmonic coefficients of order `order` to one contiguous arc.
///
/// `angles` must be the (slice of the) unwrapped angle table of the arc;
/// radii are measured from `center`. The fit is a linear least squares of
/// the radial deviations against the cosine/sine basis, solved through the
/// normal equations.
///
/// # Errors
///
/// - `FitError::InvalidOrder` if `order` is 0.
/// - `FitError::InsufficientSamples` if the arc has fewer than `2·order + 1`
///   vertices, which would leave the system underdetermined.
/// - `FitError::NumericInstability` if the normal equations are not positive
///   definite (angular span too small, duplicated angles).
pub fn fit_harmonics(
    order: usize,
    planar: &[Point2],
    center: Point2,
    angles: &[f64],
) -> Result<HarmonicModel> {
    if order == 0 {
        return Err(FitError::InvalidOrder(order).into());
    }
    let n = planar.len();
    let needed = 2 * order + 1;
    if n < needed {
        return Err(FitError::InsufficientSamples {
            order,
            needed,
            got: n,
        }
        .into());
    }

    let baseline = mean_radius(planar, center);
    let deviations = DVector::from_iterator(
        n,
        planar.iter().map(|p| (p - center).norm() - baseline),
    );

    let mut basis = DMatrix::zeros(n, 2 * order);
    for i in 0..n {
        for k in 1..=order {
            #[allow(clippy::cast_precision_loss)]
            let freq = k as f64;
            basis[(i, k - 1)] = (freq * angles[i]).cos();
            basis[(i, order + k - 1)] = (freq * angles[i]).sin();
        }
    }

    let basis_t = basis.transpose();
    let gram = &basis_t * &basis;
    let rhs = &basis_t * &deviations;
    let solution = gram
        .cholesky()
        .ok_or_else(|| {
            FitError::NumericInstability(
                "normal equations are not positive definite".into(),
            )
        })?
        .solve(&rhs);

    let a = solution.rows(0, order).iter().copied().collect();
    let b = solution.rows(order, order).iter().copied().collect();
    Ok(HarmonicModel { baseline, a, b })
}
