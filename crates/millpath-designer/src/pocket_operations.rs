//! Pocket operations for interior clearing.
//!
//! Implements scanline pocketing: horizontal scanlines spaced one tool radius
//! apart are sampled at a fixed step, and every run of inside samples becomes
//! an independent cut segment pulled in by the tool radius at both ends.
//! Containment is even-odd over the boundary and any hole contours, so
//! islands are left standing.

use crate::toolpath::ToolPath;
use millpath_core::{Point, Tool};

/// Default distance between samples along a scanline, in mm.
pub const DEFAULT_SCAN_STEP: f64 = 0.1;
/// Default overscan past the bounding box on both sides, in mm.
pub const DEFAULT_EDGE_MARGIN: f64 = 0.1;

/// Scanline pocket generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PocketGenerator {
    pub scan_step: f64,
    pub edge_margin: f64,
}

impl Default for PocketGenerator {
    fn default() -> Self {
        Self {
            scan_step: DEFAULT_SCAN_STEP,
            edge_margin: DEFAULT_EDGE_MARGIN,
        }
    }
}

impl PocketGenerator {
    pub fn new(scan_step: f64, edge_margin: f64) -> Self {
        Self {
            scan_step,
            edge_margin,
        }
    }

    /// Generates the pocket for a closed `boundary` minus `holes`.
    ///
    /// Open contours are closed first. Runs too narrow for the tool are
    /// dropped, so the result may be empty.
    pub fn generate(
        &self,
        name: impl Into<String>,
        boundary: &[Point],
        holes: &[Vec<Point>],
        tool: &Tool,
    ) -> ToolPath {
        let name = name.into();
        let radius = tool.radius();

        let mut contours = Vec::with_capacity(holes.len() + 1);
        contours.push(close(boundary));
        contours.extend(holes.iter().map(|h| close(h)));

        let Some((min, max)) = bounds(&contours[0]) else {
            return ToolPath::segments(name, Vec::new());
        };

        let mut pairs = Vec::new();
        let mut row = 1;
        loop {
            let y = min.y + radius * row as f64;
            if y > max.y {
                break;
            }
            self.scan_row(y, min.x, max.x, radius, &contours, &mut pairs);
            row += 1;
        }

        tracing::trace!("Pocket '{}' has {} segments", name, pairs.len());
        ToolPath::segments(name, pairs)
    }

    fn scan_row(
        &self,
        y: f64,
        min_x: f64,
        max_x: f64,
        radius: f64,
        contours: &[Vec<Point>],
        pairs: &mut Vec<(Point, Point)>,
    ) {
        let start_x = min_x - self.edge_margin;
        let end_x = max_x + self.edge_margin;

        let mut entry: Option<f64> = None;
        let mut last_inside = start_x;
        let mut i = 0usize;
        loop {
            let x = start_x + self.scan_step * i as f64;
            if x > end_x {
                break;
            }
            let inside = contains_point(&Point::new(x, y), contours);
            match (entry, inside) {
                (None, true) => entry = Some(x),
                (Some(first), false) => {
                    push_pair(first, last_inside, y, radius, pairs);
                    entry = None;
                }
                _ => {}
            }
            if inside {
                last_inside = x;
            }
            i += 1;
        }
        if let Some(first) = entry {
            push_pair(first, last_inside, y, radius, pairs);
        }
    }
}

fn push_pair(first: f64, last: f64, y: f64, radius: f64, pairs: &mut Vec<(Point, Point)>) {
    let entry = first + radius;
    let exit = last - radius;
    if entry <= exit {
        pairs.push((Point::new(entry, y), Point::new(exit, y)));
    }
}

fn close(points: &[Point]) -> Vec<Point> {
    let mut closed = points.to_vec();
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if first != last {
            closed.push(*first);
        }
    }
    closed
}

/// Axis-aligned bounds of a point list.
pub fn bounds(points: &[Point]) -> Option<(Point, Point)> {
    let first = points.first()?;
    let init = (*first, *first);
    Some(points.iter().fold(init, |(min, max), p| {
        (
            Point::new(min.x.min(p.x), min.y.min(p.y)),
            Point::new(max.x.max(p.x), max.y.max(p.y)),
        )
    }))
}

/// Even-odd containment over a set of closed contours.
pub fn contains_point(point: &Point, contours: &[Vec<Point>]) -> bool {
    let mut inside = false;
    for contour in contours {
        for edge in contour.windows(2) {
            let (a, b) = (edge[0], edge[1]);
            if (a.y > point.y) != (b.y > point.y) {
                let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x {
                    inside = !inside;
                }
            }
        }
    }
    inside
}

/// Absolute area of a closed contour (shoelace formula).
pub fn area(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
        .sum::<f64>()
        .abs()
        / 2.0
}
