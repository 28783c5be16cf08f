//! Reconstruction of fitted curves from harmonic models.
//!
//! The assembler turns fitted coefficients back into vertex sequences for
//! each segmentation mode and aggregates whole-curve error metrics. Across
//! halves and composite segments the aggregation convention is worst-case:
//! the reported Ea/Em is the maximum over the parts.

use crate::diagnostics::{error_metrics, ErrorMetrics};
use crate::error::{GeometryError, Result};
use crate::fitting::harmonic::{fit_harmonics, mean_radius, HarmonicModel};
use crate::fitting::order::{find_order, FitTolerance};
use crate::geometry::CurveSample;
use crate::math::Point2;
use crate::segmentation::segment::Segment;

/// A fitted vertex sequence with its normalized errors.
#[derive(Debug, Clone)]
pub struct FitResult {
    /// Fitted planar vertices, one per input vertex of the segment.
    pub vertices: Vec<Point2>,
    /// Normalized Ea/Em against the observed vertices.
    pub errors: ErrorMetrics,
}

/// How the harmonic order of a fit is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderChoice {
    /// Fixed order supplied by the caller.
    Manual(usize),
    /// Smallest order meeting the tolerances (adaptive search).
    Auto(FitTolerance),
}

/// Segmentation of the closed curve, with all mode state made explicit.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentationMode {
    /// One segment spanning the whole curve.
    SinglePiece { order: OrderChoice },
    /// Two halves split at `N/2`, the second derived by mirror symmetry.
    Symmetric { order: OrderChoice },
    /// One user-selected arc `[start..=end]`, wrapping when `start >= end`.
    /// Fragment fits always use a caller-supplied order.
    Fragment {
        start: usize,
        end: usize,
        order: usize,
    },
    /// Cut points partition the curve into as many independent segments,
    /// each with its own adaptively searched order.
    Composite {
        cut_points: Vec<usize>,
        tolerance: FitTolerance,
    },
}

/// Outcome of one composite segment; failures stay local to the segment.
#[derive(Debug)]
pub struct SegmentOutcome {
    /// Index of the segment's first vertex on the full curve.
    pub start: usize,
    /// Index of the segment's last vertex (inclusive).
    pub end: usize,
    /// The segment's fit, or the error that aborted it.
    pub outcome: Result<FitResult>,
}

/// Assembled composite fit with per-segment outcomes.
#[derive(Debug)]
pub struct CompositeFit {
    pub segments: Vec<SegmentOutcome>,
    /// Worst-case Ea/Em over the successfully fitted segments, or `None`
    /// if every segment failed.
    pub errors: Option<ErrorMetrics>,
}

/// A fitted curve in any segmentation mode.
#[derive(Debug)]
pub enum CurveFit {
    /// Closed fitted curve (single-piece and symmetric modes).
    Closed(FitResult),
    /// Open fitted arc (fragment mode).
    Fragment(FitResult),
    /// Independently fitted segments (composite mode).
    Composite(CompositeFit),
}

/// Fits a curve sample according to the segmentation mode.
///
/// # Errors
///
/// Geometry and fit errors of the active mode. In composite mode only
/// curve-level problems (an empty cut-point set) surface here; per-segment
/// failures are reported inside [`CompositeFit`].
pub fn fit_curve(sample: &CurveSample, mode: &SegmentationMode) -> Result<CurveFit> {
    match mode {
        SegmentationMode::SinglePiece { order } => {
            Ok(CurveFit::Closed(fit_single_piece(sample, *order)?))
        }
        SegmentationMode::Symmetric { order } => {
            Ok(CurveFit::Closed(fit_symmetric(sample, *order)?))
        }
        SegmentationMode::Fragment { start, end, order } => Ok(CurveFit::Fragment(fit_fragment(
            sample, *start, *end, *order,
        )?)),
        SegmentationMode::Composite {
            cut_points,
            tolerance,
        } => Ok(CurveFit::Composite(fit_composite(
            sample, cut_points, *tolerance,
        )?)),
    }
}

/// Reconstructs fitted vertices `center + r(θ_i)·(cos θ_i, sin θ_i)` and
/// measures them against the observed vertices.
///
/// `center` must be the same origin the model was fit against and the
/// angle table was derived from.
#[must_use]
pub fn form_vertices(
    model: &HarmonicModel,
    planar: &[Point2],
    center: Point2,
    angles: &[f64],
    d_bar: &[f64],
    d_bar_offset: usize,
) -> FitResult {
    let fitted: Vec<Point2> = angles
        .iter()
        .map(|&theta| model.point_at(center, theta))
        .collect();
    let errors = error_metrics(&fitted, planar, d_bar, d_bar_offset);
    FitResult {
        vertices: fitted,
        errors,
    }
}

/// Fits the whole closed curve as one segment.
///
/// # Errors
///
/// Propagates order-search and fit errors.
pub fn fit_single_piece(sample: &CurveSample, order: OrderChoice) -> Result<FitResult> {
    let order = resolve_order(
        order,
        sample.planar(),
        sample.angles(),
        sample.d_bar(),
        0,
        sample.center(),
    )?;
    let model = fit_harmonics(order, sample.planar(), sample.center(), sample.angles())?;
    Ok(form_vertices(
        &model,
        sample.planar(),
        sample.center(),
        sample.angles(),
        sample.d_bar(),
        0,
    ))
}

/// Fits the curve as two symmetric halves split at `N/2`.
///
/// Only the first half is fit; the second half's coefficients are derived
/// from it by the mirror identity, with the second half's own baseline.
/// Both halves measure radii about the full-curve center, which lies on
/// the symmetry axis, so the mirrored reconstruction reflects the first
/// half exactly. The two fitted halves are concatenated into one closed
/// sequence and the errors combined worst-case.
///
/// # Errors
///
/// Propagates order-search and fit errors from the first half, and geometry
/// errors from either half.
pub fn fit_symmetric(sample: &CurveSample, order: OrderChoice) -> Result<FitResult> {
    let n = sample.len();
    let half = n / 2;
    let center = sample.center();
    let first = Segment::extract(sample, 0, half)?;
    let second = Segment::extract(sample, half, 0)?;

    let order = resolve_order(
        order,
        first.planar(),
        first.angles(),
        sample.d_bar(),
        0,
        center,
    )?;
    let first_model = fit_harmonics(order, first.planar(), center, first.angles())?;
    let second_model = first_model.mirrored(mean_radius(second.planar(), center));

    let first_fit = form_vertices(
        &first_model,
        first.planar(),
        center,
        first.angles(),
        sample.d_bar(),
        0,
    );
    let second_fit = form_vertices(
        &second_model,
        second.planar(),
        center,
        second.angles(),
        sample.d_bar(),
        half,
    );

    // Both halves carry their shared boundary vertices; keep each boundary
    // point once so the assembled sequence has exactly N vertices.
    let mut vertices = Vec::with_capacity(n);
    vertices.extend_from_slice(&first_fit.vertices[..half]);
    vertices.extend_from_slice(&second_fit.vertices[..n - half]);

    Ok(FitResult {
        vertices,
        errors: first_fit.errors.worst(second_fit.errors),
    })
}

/// Fits one arc of the curve, leaving the rest untouched.
///
/// The fit is local to the arc (own coefficients), but radii stay measured
/// about the full-curve center and Ea/Em are normalized against the
/// full-curve baseline starting at `start`, so fragment errors compare
/// against whole-curve fits.
///
/// # Errors
///
/// Propagates geometry errors from the arc extraction and fit errors.
pub fn fit_fragment(
    sample: &CurveSample,
    start: usize,
    end: usize,
    order: usize,
) -> Result<FitResult> {
    let seg = Segment::extract(sample, start, end)?;
    let model = fit_harmonics(order, seg.planar(), sample.center(), seg.angles())?;
    Ok(form_vertices(
        &model,
        seg.planar(),
        sample.center(),
        seg.angles(),
        sample.d_bar(),
        start,
    ))
}

/// Fits every segment of a cut-point partition independently.
///
/// Segment boundaries are inclusive at both ends, so neighboring segments
/// share their boundary vertices. A failure in one segment is recorded in
/// its [`SegmentOutcome`] and does not disturb sibling segments.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` for an empty cut-point set.
pub fn fit_composite(
    sample: &CurveSample,
    cut_points: &[usize],
    tolerance: FitTolerance,
) -> Result<CompositeFit> {
    if cut_points.is_empty() {
        return Err(
            GeometryError::Degenerate("composite mode needs at least one cut point".into()).into(),
        );
    }

    let m = cut_points.len();
    let mut segments = Vec::with_capacity(m);
    let mut errors: Option<ErrorMetrics> = None;
    for i in 0..m {
        let start = cut_points[i];
        let end = cut_points[(i + 1) % m];
        let outcome = fit_one_segment(sample, start, end, tolerance);
        if let Ok(fit) = &outcome {
            errors = Some(match errors {
                Some(acc) => acc.worst(fit.errors),
                None => fit.errors,
            });
        }
        segments.push(SegmentOutcome {
            start,
            end,
            outcome,
        });
    }

    Ok(CompositeFit { segments, errors })
}

fn fit_one_segment(
    sample: &CurveSample,
    start: usize,
    end: usize,
    tolerance: FitTolerance,
) -> Result<FitResult> {
    let seg = Segment::extract(sample, start, end)?;
    let order = find_order(
        seg.planar(),
        seg.angles(),
        sample.d_bar(),
        start,
        sample.center(),
        tolerance,
    )?;
    let model = fit_harmonics(order, seg.planar(), sample.center(), seg.angles())?;
    Ok(form_vertices(
        &model,
        seg.planar(),
        sample.center(),
        seg.angles(),
        sample.d_bar(),
        start,
    ))
}

fn resolve_order(
    choice: OrderChoice,
    planar: &[Point2],
    angles: &[f64],
    d_bar: &[f64],
    d_bar_offset: usize,
    center: Point2,
) -> Result<usize> {
    match choice {
        OrderChoice::Manual(order) => Ok(order),
        OrderChoice::Auto(tolerance) => {
            find_order(planar, angles, d_bar, d_bar_offset, center, tolerance)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use std::f64::consts::TAU;

    fn sample_with_radius(n: usize, radius: impl Fn(f64) -> f64) -> CurveSample {
        let verts = (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let t = TAU * i as f64 / n as f64;
                let r = radius(t);
                Point3::new(r * t.cos(), 0.0, r * t.sin())
            })
            .collect();
        CurveSample::from_vertices(verts).unwrap()
    }

    #[test]
    fn single_piece_reproduces_a_circle() {
        let sample = sample_with_radius(16, |_| 1.0);
        let fit = fit_single_piece(&sample, OrderChoice::Manual(3)).unwrap();
        assert_eq!(fit.vertices.len(), 16);
        assert!(fit.errors.area < 1e-9);
        assert!(fit.errors.max < 1e-9);
        for (f, o) in fit.vertices.iter().zip(sample.planar()) {
            assert!((f - o).norm() < 1e-9);
        }
    }

    #[test]
    fn single_piece_auto_matches_manual_on_band_limited_curve() {
        let sample = sample_with_radius(48, |t| 1.0 + 0.2 * (3.0 * t).cos());
        let auto = fit_single_piece(
            &sample,
            OrderChoice::Auto(FitTolerance {
                area: 1e-6,
                max: 1e-6,
            }),
        )
        .unwrap();
        let manual = fit_single_piece(&sample, OrderChoice::Manual(3)).unwrap();
        for (a, m) in auto.vertices.iter().zip(&manual.vertices) {
            assert!((a - m).norm() < 1e-6);
        }
    }

    #[test]
    fn symmetric_fit_is_closed_and_mirror_symmetric() {
        // Even harmonic content only, so the curve is bilaterally symmetric
        // about the split axis through vertices 0 and N/2.
        let n = 32;
        let sample = sample_with_radius(n, |t| 1.5 + 0.3 * (2.0 * t).cos());
        let fit = fit_symmetric(&sample, OrderChoice::Manual(4)).unwrap();
        assert_eq!(fit.vertices.len(), n);
        assert!(fit.errors.max < 0.1, "Em={}", fit.errors.max);
        for i in 1..n / 2 {
            let p = fit.vertices[i];
            let q = fit.vertices[n - i];
            assert!((p.x - q.x).abs() < 1e-9, "x mismatch at {i}");
            assert!((p.y + q.y).abs() < 1e-9, "y mismatch at {i}");
        }
    }

    #[test]
    fn fragment_fit_covers_only_the_arc() {
        let sample = sample_with_radius(16, |_| 1.0);
        let fit = fit_fragment(&sample, 12, 4, 2).unwrap();
        assert_eq!(fit.vertices.len(), 9);
        assert!(fit.errors.max < 1e-9, "Em={}", fit.errors.max);
    }

    #[test]
    fn shallow_arc_fragment_reproduces_its_vertices() {
        // A short arc's own centroid sits almost on the arc itself; radii
        // measured about the curve center keep the radial profile
        // single-valued, so the fitted arc lands on the observed one.
        let sample = sample_with_radius(16, |_| 1.0);
        let fit = fit_fragment(&sample, 0, 4, 2).unwrap();
        assert_eq!(fit.vertices.len(), 5);
        for (f, o) in fit.vertices.iter().zip(&sample.planar()[..5]) {
            assert!((f - o).norm() < 1e-9);
        }
    }

    #[test]
    fn composite_single_cut_spans_the_curve() {
        let sample = sample_with_radius(16, |_| 1.0);
        let fit = fit_composite(&sample, &[0], FitTolerance::default()).unwrap();
        assert_eq!(fit.segments.len(), 1);
        let seg = fit.segments[0].outcome.as_ref().unwrap();
        assert_eq!(seg.vertices.len(), 17);
        assert!(fit.errors.unwrap().max <= 0.025);
    }

    #[test]
    fn composite_segments_stay_continuous_at_shared_boundaries() {
        let sample = sample_with_radius(16, |_| 1.0);
        let tolerance = FitTolerance::default();
        let single = fit_composite(&sample, &[0], tolerance).unwrap();
        let split = fit_composite(&sample, &[0, 8], tolerance).unwrap();

        let row_single = single.segments[0].outcome.as_ref().unwrap();
        let row_a = split.segments[0].outcome.as_ref().unwrap();
        let row_b = split.segments[1].outcome.as_ref().unwrap();

        // Boundary vertices are shared samples reconstructed along the same
        // ray from the shared center; on a circle both fits are exact, so
        // the neighboring reconstructions coincide.
        let bound = 1e-9;
        let last_a = row_a.vertices[row_a.vertices.len() - 1];
        assert!((last_a - row_b.vertices[0]).norm() < bound);
        let last_b = row_b.vertices[row_b.vertices.len() - 1];
        assert!((last_b - row_a.vertices[0]).norm() < bound);
        assert!((row_single.vertices[8] - row_b.vertices[0]).norm() < bound);
    }

    #[test]
    fn composite_isolates_per_segment_failures() {
        // The two-vertex segment [0..=1] cannot support any harmonic order;
        // its siblings must still fit.
        let sample = sample_with_radius(16, |_| 1.0);
        let fit = fit_composite(&sample, &[0, 1, 8], FitTolerance::default()).unwrap();
        assert_eq!(fit.segments.len(), 3);
        assert!(fit.segments[0].outcome.is_err());
        assert!(fit.segments[1].outcome.is_ok());
        assert!(fit.segments[2].outcome.is_ok());
        assert!(fit.errors.is_some());
    }

    #[test]
    fn auto_fit_errors_meet_the_search_tolerances() {
        // Off-center curve: the order search must accept a fit by the same
        // Ea/Em the assembled result reports.
        let n = 40;
        let verts = (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let t = TAU * i as f64 / n as f64;
                let r = 1.0 + 0.15 * (3.0 * t).cos();
                Point3::new(2.0 + r * t.cos(), 0.0, 1.0 + r * t.sin())
            })
            .collect();
        let sample = CurveSample::from_vertices(verts).unwrap();
        let tolerance = FitTolerance::default();
        let fit = fit_single_piece(&sample, OrderChoice::Auto(tolerance)).unwrap();
        assert!(fit.errors.area <= tolerance.area, "Ea={}", fit.errors.area);
        assert!(fit.errors.max <= tolerance.max, "Em={}", fit.errors.max);
    }

    #[test]
    fn empty_cut_point_set_is_rejected() {
        let sample = sample_with_radius(16, |_| 1.0);
        assert!(fit_composite(&sample, &[], FitTolerance::default()).is_err());
    }

    #[test]
    fn fit_curve_dispatches_by_mode() {
        let sample = sample_with_radius(16, |_| 1.0);
        let closed = fit_curve(
            &sample,
            &SegmentationMode::SinglePiece {
                order: OrderChoice::Manual(2),
            },
        )
        .unwrap();
        assert!(matches!(closed, CurveFit::Closed(_)));

        let fragment = fit_curve(
            &sample,
            &SegmentationMode::Fragment {
                start: 2,
                end: 10,
                order: 2,
            },
        )
        .unwrap();
        assert!(matches!(fragment, CurveFit::Fragment(_)));

        let composite = fit_curve(
            &sample,
            &SegmentationMode::Composite {
                cut_points: vec![0, 8],
                tolerance: FitTolerance::default(),
            },
        )
        .unwrap();
        assert!(matches!(composite, CurveFit::Composite(_)));
    }
}
