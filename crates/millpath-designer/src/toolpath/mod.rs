//! Toolpaths produced by shapes.

use millpath_core::Point;
use serde::{Deserialize, Serialize};

/// How the points of a toolpath are cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PathKind {
    /// Cut from point to point in order
    #[default]
    Continuous,
    /// Consecutive point pairs are independent entry/exit segments
    Segments,
}

/// A named, ordered point sequence in machining order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolPath {
    pub name: String,
    pub points: Vec<Point>,
    #[serde(default)]
    pub kind: PathKind,
}

impl ToolPath {
    /// Creates a continuous toolpath.
    pub fn new(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            points,
            kind: PathKind::Continuous,
        }
    }

    /// Creates a toolpath of independent `(entry, exit)` segments.
    pub fn segments(name: impl Into<String>, pairs: Vec<(Point, Point)>) -> Self {
        Self {
            name: name.into(),
            points: pairs.into_iter().flat_map(|(a, b)| [a, b]).collect(),
            kind: PathKind::Segments,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    /// The points with the first point repeated at the end if needed.
    pub fn closed_points(&self) -> Vec<Point> {
        let mut points = self.points.clone();
        if !self.is_closed() {
            if let Some(first) = points.first().copied() {
                points.push(first);
            }
        }
        points
    }

    /// The point runs cut without leaving the material: the whole path, or
    /// each segment of a [`PathKind::Segments`] path.
    pub fn runs(&self) -> Vec<&[Point]> {
        match self.kind {
            PathKind::Continuous if self.points.is_empty() => Vec::new(),
            PathKind::Continuous => vec![self.points.as_slice()],
            PathKind::Segments => self.points.chunks_exact(2).collect(),
        }
    }

    /// Total cut length across all runs.
    pub fn cut_length(&self) -> f64 {
        self.runs()
            .iter()
            .flat_map(|run| run.windows(2))
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }
}

/// Everything a shape produced: its primary paths and any pocket paths.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeToolpaths {
    pub primary: Vec<ToolPath>,
    pub pockets: Vec<ToolPath>,
}

impl ShapeToolpaths {
    pub fn single(path: ToolPath) -> Self {
        Self {
            primary: vec![path],
            pockets: Vec::new(),
        }
    }

    /// Primary paths followed by pocket paths, the order they are emitted in.
    pub fn iter(&self) -> impl Iterator<Item = &ToolPath> {
        self.primary.iter().chain(self.pockets.iter())
    }

    pub fn len(&self) -> usize {
        self.primary.len() + self.pockets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
