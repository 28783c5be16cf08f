//! Contiguous sub-ranges of a closed curve.

use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::geometry::CurveSample;
use crate::math::Point2;

/// A contiguous sub-range of a closed curve, inclusive of both endpoints.
///
/// The range may wrap past the end of the vertex sequence; wrapped entries
/// of the angle slice are lifted by a full revolution so the slice stays
/// monotone. The angle slice is defined about the full-curve center, so
/// segment fits measure radii about that same center and share the
/// full-curve radial baseline for error normalization.
#[derive(Debug, Clone)]
pub struct Segment {
    start: usize,
    end: usize,
    planar: Vec<Point2>,
    angles: Vec<f64>,
}

impl Segment {
    /// Extracts the sub-range `[start..=end]` of the sample, wrapping past
    /// the last vertex when `start >= end`. `start == end` yields the whole
    /// closed curve with the shared vertex repeated at both ends.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if either index is out of range.
    pub fn extract(sample: &CurveSample, start: usize, end: usize) -> Result<Self> {
        let n = sample.len();
        if start >= n || end >= n {
            return Err(GeometryError::Degenerate(format!(
                "cut point {} out of range for a {n}-vertex curve",
                start.max(end)
            ))
            .into());
        }

        let full_planar = sample.planar();
        let full_angles = sample.angles();
        let mut planar = Vec::new();
        let mut angles = Vec::new();
        if start < end {
            planar.extend_from_slice(&full_planar[start..=end]);
            angles.extend_from_slice(&full_angles[start..=end]);
        } else {
            planar.extend_from_slice(&full_planar[start..]);
            planar.extend_from_slice(&full_planar[..=end]);
            angles.extend_from_slice(&full_angles[start..]);
            angles.extend(full_angles[..=end].iter().map(|a| a + TAU));
        }

        Ok(Self {
            start,
            end,
            planar,
            angles,
        })
    }

    /// Index of the segment's first vertex on the full curve.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index of the segment's last vertex on the full curve (inclusive).
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of vertices in the segment, boundary vertices included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.planar.len()
    }

    /// Always false: a segment holds at least its two boundary vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.planar.is_empty()
    }

    /// Planar vertices of the segment.
    #[must_use]
    pub fn planar(&self) -> &[Point2] {
        &self.planar
    }

    /// Monotone slice of the full-curve angle table.
    #[must_use]
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }
}
