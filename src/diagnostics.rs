//! Normalized error metrics and curvature-based cut-point ranking.

use crate::math::{Point2, TOLERANCE};

/// Normalized approximation errors of a fitted segment.
///
/// `area` (Ea) is the mean per-vertex radial deviation divided by the radial
/// baseline; `max` (Em) is the worst single-vertex deviation, normalized the
/// same way. Both are dimensionless and comparable across segmentations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorMetrics {
    pub area: f64,
    pub max: f64,
}

impl ErrorMetrics {
    /// Worst-case combination of two metric sets.
    ///
    /// This is the aggregation convention for symmetric halves and composite
    /// segments: the whole-curve Ea/Em is the maximum over its parts.
    #[must_use]
    pub fn worst(self, other: Self) -> Self {
        Self {
            area: self.area.max(other.area),
            max: self.max.max(other.max),
        }
    }
}

/// Computes Ea and Em in one pass over paired fitted/observed vertices.
///
/// `d_bar` is the full-curve radial baseline; `offset` is the index of the
/// segment's first vertex within it, so segment metrics normalize against
/// the same baseline entries as the whole curve. Entries with a near-zero
/// baseline are skipped rather than propagating infinities or NaN. If every
/// entry is skipped, both metrics are `f64::INFINITY` so no tolerance can be
/// satisfied by a degenerate comparison.
#[must_use]
pub fn error_metrics(
    fitted: &[Point2],
    observed: &[Point2],
    d_bar: &[f64],
    offset: usize,
) -> ErrorMetrics {
    let mut sum = 0.0;
    let mut max = 0.0_f64;
    let mut counted = 0usize;
    for (i, (f, o)) in fitted.iter().zip(observed).enumerate() {
        let baseline = d_bar[(offset + i) % d_bar.len()];
        if baseline < TOLERANCE {
            continue;
        }
        let e = (f - o).norm() / baseline;
        sum += e;
        max = max.max(e);
        counted += 1;
    }
    if counted == 0 {
        return ErrorMetrics {
            area: f64::INFINITY,
            max: f64::INFINITY,
        };
    }
    #[allow(clippy::cast_precision_loss)]
    let count = counted as f64;
    ErrorMetrics {
        area: sum / count,
        max,
    }
}

/// Normalized area error Ea between fitted and observed vertices.
#[must_use]
pub fn area_error(fitted: &[Point2], observed: &[Point2], d_bar: &[f64], offset: usize) -> f64 {
    error_metrics(fitted, observed, d_bar, offset).area
}

/// Normalized maximum single-vertex error Em.
#[must_use]
pub fn max_error(fitted: &[Point2], observed: &[Point2], d_bar: &[f64], offset: usize) -> f64 {
    error_metrics(fitted, observed, d_bar, offset).max
}

/// Ranks vertex indices by descending curvature magnitude.
///
/// Ties break by ascending original index, so the ranking is deterministic.
/// Used to suggest high-curvature cut-point candidates for composite
/// segmentation.
#[must_use]
pub fn rank_by_curvature(curvatures: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..curvatures.len()).collect();
    indices.sort_by(|&i, &j| {
        curvatures[j]
            .abs()
            .total_cmp(&curvatures[i].abs())
            .then_with(|| i.cmp(&j))
    });
    indices
}
