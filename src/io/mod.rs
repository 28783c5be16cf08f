//! Persisted text formats shared with the extraction and fitting tools.
//!
//! Two formats exist: the vertex file produced by the cross-section
//! extraction command (one `x y z` triple per line, closed-curve order by
//! line order), and the `.dat` coefficient record written per saved fit.

use std::fs;
use std::path::Path;

use crate::error::{ParseError, Result};
use crate::fitting::HarmonicModel;
use crate::geometry::CurveSample;
use crate::math::{Point2, Point3};

/// Parses whitespace-separated `x y z` vertices, one per line.
///
/// Line order is traversal order around the closed curve. Blank lines are
/// skipped.
///
/// # Errors
///
/// Returns `ParseError` for a line with a field count other than 3 or a
/// token that is not a float.
pub fn parse_vertices(text: &str) -> Result<Vec<Point3>> {
    let mut vertices = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(ParseError::FieldCount {
                line: index + 1,
                expected: 3,
                got: fields.len(),
            }
            .into());
        }
        let x = parse_float(fields[0], index + 1)?;
        let y = parse_float(fields[1], index + 1)?;
        let z = parse_float(fields[2], index + 1)?;
        vertices.push(Point3::new(x, y, z));
    }
    Ok(vertices)
}

/// Reads a vertex file and derives the full curve sample from it.
///
/// # Errors
///
/// Propagates IO, parse, and geometry errors.
pub fn read_curve(path: &Path) -> Result<CurveSample> {
    let text = fs::read_to_string(path)?;
    CurveSample::from_vertices(parse_vertices(&text)?)
}

/// One saved fit: angular range, fitting center, and harmonic amplitudes.
///
/// Serialized line format (`0-360` for a single-piece fit):
///
/// ```text
/// range:0-360
/// center: <x> <y>
/// a: <a1> <a2> ... <aJ>
/// b: <b1> <b2> ... <bJ>
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DatRecord {
    /// Angular range of the fit in degrees.
    pub range: (f64, f64),
    /// Fitting center in working-plane coordinates.
    pub center: Point2,
    /// Cosine amplitudes in harmonic-index order starting at k = 1.
    pub a: Vec<f64>,
    /// Sine amplitudes in harmonic-index order starting at k = 1.
    pub b: Vec<f64>,
}

impl DatRecord {
    /// Builds the record of a single-piece fit (full 0-360 range).
    #[must_use]
    pub fn single_piece(center: Point2, model: &HarmonicModel) -> Self {
        Self {
            range: (0.0, 360.0),
            center,
            a: model.a().to_vec(),
            b: model.b().to_vec(),
        }
    }

    /// Serializes the record in the `.dat` line format.
    ///
    /// Floats use the shortest representation that round-trips, so
    /// re-parsing yields numerically identical values.
    #[must_use]
    pub fn to_dat(&self) -> String {
        let mut out = format!("range:{}-{}\n", self.range.0, self.range.1);
        out.push_str(&format!("center: {} {}\n", self.center.x, self.center.y));
        out.push_str("a:");
        for v in &self.a {
            out.push_str(&format!(" {v}"));
        }
        out.push_str("\nb:");
        for v in &self.b {
            out.push_str(&format!(" {v}"));
        }
        out.push('\n');
        out
    }

    /// Parses a `.dat` record.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` if a line is absent and
    /// `ParseError::InvalidNumber` for malformed values.
    pub fn parse(text: &str) -> Result<Self> {
        let mut range = None;
        let mut center = None;
        let mut a = None;
        let mut b = None;
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            let lineno = index + 1;
            if let Some(rest) = line.strip_prefix("range:") {
                let rest = rest.trim();
                let (start, end) = rest
                    .split_once('-')
                    .ok_or(ParseError::MissingField("range"))?;
                range = Some((
                    parse_float(start.trim(), lineno)?,
                    parse_float(end.trim(), lineno)?,
                ));
            } else if let Some(rest) = line.strip_prefix("center:") {
                let fields: Vec<&str> = rest.split_whitespace().collect();
                if fields.len() != 2 {
                    return Err(ParseError::FieldCount {
                        line: lineno,
                        expected: 2,
                        got: fields.len(),
                    }
                    .into());
                }
                center = Some(Point2::new(
                    parse_float(fields[0], lineno)?,
                    parse_float(fields[1], lineno)?,
                ));
            } else if let Some(rest) = line.strip_prefix("a:") {
                a = Some(parse_float_list(rest, lineno)?);
            } else if let Some(rest) = line.strip_prefix("b:") {
                b = Some(parse_float_list(rest, lineno)?);
            }
        }
        Ok(Self {
            range: range.ok_or(ParseError::MissingField("range"))?,
            center: center.ok_or(ParseError::MissingField("center"))?,
            a: a.ok_or(ParseError::MissingField("a"))?,
            b: b.ok_or(ParseError::MissingField("b"))?,
        })
    }
}

/// Writes a `.dat` record to a file.
///
/// # Errors
///
/// Propagates IO errors.
pub fn write_dat(path: &Path, record: &DatRecord) -> Result<()> {
    fs::write(path, record.to_dat())?;
    Ok(())
}

/// Reads a `.dat` record from a file.
///
/// # Errors
///
/// Propagates IO and parse errors.
pub fn read_dat(path: &Path) -> Result<DatRecord> {
    DatRecord::parse(&fs::read_to_string(path)?)
}

fn parse_float(token: &str, line: usize) -> Result<f64> {
    token.parse().map_err(|_| {
        ParseError::InvalidNumber {
            line,
            token: token.to_string(),
        }
        .into()
    })
}

fn parse_float_list(text: &str, line: usize) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|token| parse_float(token, line))
        .collect()
}
