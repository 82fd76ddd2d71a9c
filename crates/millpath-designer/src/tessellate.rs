//! Curve tessellation
//!
//! Flattens Bezier runs and through-point splines into polylines:
//! - de Casteljau subdivision at a fixed depth
//! - Catmull-Rom style conversion of spline knots into cubic Beziers
//! - a polyline walker that mixes straight runs, Bezier runs, and spline
//!   segments in document order
//!
//! Points are always appended to a [`PointAccumulator`] in traversal order.

use millpath_core::{ControlPoint, Point, PointRole, ShapeError, ShapeResult};

/// Subdivision depth for explicit Bezier runs
pub const BEZIER_DEPTH: u32 = 4;
/// Subdivision depth for spline-derived cubics
pub const SPLINE_DEPTH: u32 = 5;

/// Share of the chord length used for the handle at a plain anchor next to
/// a spline knot.
const ANCHOR_HANDLE_RATIO: f64 = 0.4;

/// Ordered point list that never repeats its last point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointAccumulator {
    points: Vec<Point>,
}

impl PointAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `point` unless it equals the current last point.
    pub fn push(&mut self, point: Point) {
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

/// Tessellates the Bezier curve with the given control polygon.
///
/// A degree-`n` curve is split at `t = 0.5` into two halves whose control
/// polygons are the first column and the anti-diagonal of the interpolation
/// triangle; each half recurses with `depth - 1` until it is emitted as a
/// straight segment, giving `2^depth` segments. A two-point polygon is a
/// straight segment at any depth.
pub fn bezier(control: &[Point], depth: u32, out: &mut PointAccumulator) {
    match control {
        [] => {}
        [only] => out.push(*only),
        [first, last] => {
            out.push(*first);
            out.push(*last);
        }
        _ if depth == 0 => {
            out.push(control[0]);
            out.push(control[control.len() - 1]);
        }
        _ => {
            let (left, right) = split_half(control);
            bezier(&left, depth - 1, out);
            bezier(&right, depth - 1, out);
        }
    }
}

fn split_half(control: &[Point]) -> (Vec<Point>, Vec<Point>) {
    let n = control.len() - 1;
    let mut rows: Vec<Vec<Point>> = Vec::with_capacity(n + 1);
    rows.push(control.to_vec());
    for k in 1..=n {
        let prev = &rows[k - 1];
        let row = prev.windows(2).map(|w| w[0].lerp(&w[1], 0.5)).collect();
        rows.push(row);
    }
    let left = (0..=n).map(|k| rows[k][0]).collect();
    let right = (0..=n).map(|k| rows[n - k][k]).collect();
    (left, right)
}

/// Neighbour lookup over an ordered point run, synthesising the points
/// beyond either end.
struct Neighbours<'a> {
    points: &'a [Point],
    closed: bool,
}

impl<'a> Neighbours<'a> {
    fn new(points: &'a [Point]) -> Self {
        let closed = points.len() >= 3 && points.first() == points.last();
        Self { points, closed }
    }

    fn before(&self, index: usize) -> Point {
        let p = self.points;
        if index > 0 {
            p[index - 1]
        } else if self.closed {
            p[p.len() - 2]
        } else {
            p[0] * 2.0 - p[1]
        }
    }

    fn after(&self, index: usize) -> Point {
        let p = self.points;
        let last = p.len() - 1;
        if index < last {
            p[index + 1]
        } else if self.closed {
            p[1]
        } else {
            p[last] * 2.0 - p[last - 1]
        }
    }
}

/// Tessellates the spline segment from `entries[start]` to `entries[end]`.
///
/// Knot ends get a Catmull-Rom handle of `0.5 * (next - prev) / 3`. A plain
/// anchor end keeps the direction of the run it belongs to, with a handle of
/// `0.4 * chord`.
pub fn spline_segment(
    entries: &[ControlPoint],
    start: usize,
    end: usize,
    out: &mut PointAccumulator,
) {
    let positions: Vec<Point> = entries.iter().map(|e| e.position).collect();
    let neighbours = Neighbours::new(&positions);
    let p0 = positions[start];
    let p3 = positions[end];
    let chord = p0.distance_to(&p3);

    let c1 = match entries[start].role {
        PointRole::SplineThrough => {
            (neighbours.after(start) - neighbours.before(start)) * (0.5 / 3.0)
        }
        _ => anchor_handle(p0 - neighbours.before(start), chord),
    };
    let c2 = match entries[end].role {
        PointRole::SplineThrough => (neighbours.after(end) - neighbours.before(end)) * (0.5 / 3.0),
        _ => anchor_handle(neighbours.after(end) - p3, chord),
    };

    bezier(&[p0, p0 + c1, p3 - c2, p3], SPLINE_DEPTH, out);
}

fn anchor_handle(direction: Point, chord: f64) -> Point {
    direction
        .normalized()
        .map(|unit| unit * (ANCHOR_HANDLE_RATIO * chord))
        .unwrap_or_default()
}

/// Tessellates a role-tagged polyline description.
///
/// - an Anchor emits itself, or closes a spline when it follows a knot
/// - a maximal run of BezierControl entries is one curve from the last
///   emitted point to the next on-curve entry
/// - a SplineThrough entry after an on-curve entry adds a spline segment
///
/// A Bezier run without a preceding point or a following on-curve entry is
/// a [`ShapeError::MissingParameter`].
pub fn polyline(entries: &[ControlPoint], shape: &str) -> ShapeResult<Vec<Point>> {
    let mut out = PointAccumulator::new();
    let mut i = 0;
    while i < entries.len() {
        let entry = entries[i];
        let previous = i.checked_sub(1).map(|p| entries[p].role);
        match entry.role {
            PointRole::Anchor => {
                if previous == Some(PointRole::SplineThrough) {
                    spline_segment(entries, i - 1, i, &mut out);
                } else {
                    out.push(entry.position);
                }
            }
            PointRole::SplineThrough => {
                if previous.is_some_and(|role| role.is_on_curve()) {
                    spline_segment(entries, i - 1, i, &mut out);
                } else {
                    out.push(entry.position);
                }
            }
            PointRole::BezierControl => {
                let start = out
                    .last()
                    .ok_or_else(|| ShapeError::missing(shape, "point"))?;
                let run_end = entries[i..]
                    .iter()
                    .position(|e| e.role.is_on_curve())
                    .map(|offset| i + offset)
                    .ok_or_else(|| ShapeError::missing(shape, "point"))?;

                let mut control = Vec::with_capacity(run_end - i + 2);
                control.push(start);
                control.extend(entries[i..run_end].iter().map(|e| e.position));
                control.push(entries[run_end].position);
                bezier(&control, BEZIER_DEPTH, &mut out);

                i = run_end;
                continue;
            }
        }
        i += 1;
    }
    Ok(out.into_points())
}
