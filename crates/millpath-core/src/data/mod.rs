//! Data models for Millpath
//!
//! This module provides:
//! - 2D points and the vector arithmetic the geometry builders need
//! - Role-tagged control points read from shape descriptors
//! - Depth ranges for multi-pass cutting
//! - Tool definitions and the named tool registry

pub mod tools;

use crate::error::ShapeError;
use crate::program::round_value;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Upper bound on the number of Z passes a single depth range may request.
pub const MAX_DEPTH_PASSES: usize = 10_000;

/// A point (or vector) in the XY plane, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Length of this point taken as a vector from the origin.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalized(&self) -> Option<Point> {
        let len = self.length();
        if len > f64::EPSILON {
            Some(Point::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    /// Returns a new point shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Linear interpolation towards `other` at parameter `t`.
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x * (1.0 - t) + other.x * t,
            self.y * (1.0 - t) + other.y * t,
        )
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Role of a control point within a polyline description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointRole {
    /// On-curve point the path passes through
    Anchor,
    /// Off-curve Bezier handle
    BezierControl,
    /// On-curve knot of a through-point spline
    SplineThrough,
}

impl PointRole {
    /// Whether the path passes through points with this role.
    pub fn is_on_curve(&self) -> bool {
        !matches!(self, PointRole::BezierControl)
    }
}

impl std::fmt::Display for PointRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anchor => write!(f, "anchor"),
            Self::BezierControl => write!(f, "bezier control"),
            Self::SplineThrough => write!(f, "spline knot"),
        }
    }
}

/// A role-tagged point read from a shape descriptor.
///
/// Control points are never mutated; translation produces a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub position: Point,
    pub role: PointRole,
}

impl ControlPoint {
    pub fn new(position: Point, role: PointRole) -> Self {
        Self { position, role }
    }

    pub fn anchor(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), PointRole::Anchor)
    }

    pub fn control(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), PointRole::BezierControl)
    }

    pub fn through(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), PointRole::SplineThrough)
    }

    /// Returns a copy shifted by `(dx, dy)` with the same role.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.position.translated(dx, dy), self.role)
    }
}

/// Start depth, end depth, and per-pass step of a multi-pass cut.
///
/// Passes run from `start_z` down to `end_z` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthRange {
    start_z: f64,
    end_z: f64,
    step_z: f64,
}

impl DepthRange {
    /// Creates a depth range, rejecting a non-positive step.
    pub fn new(start_z: f64, end_z: f64, step_z: f64) -> Result<Self, ShapeError> {
        if !(start_z.is_finite() && end_z.is_finite() && step_z.is_finite()) {
            return Err(ShapeError::invalid_argument(
                "depth range",
                "depth",
                "values must be finite",
            ));
        }
        if step_z <= 0.0 {
            return Err(ShapeError::invalid_argument(
                "depth range",
                "depth",
                format!("step must be > 0, got {step_z}"),
            ));
        }
        let passes = ((start_z - end_z) / step_z).floor();
        if passes >= MAX_DEPTH_PASSES as f64 {
            return Err(ShapeError::invalid_argument(
                "depth range",
                "depth",
                format!("{passes} passes exceeds the limit of {MAX_DEPTH_PASSES}"),
            ));
        }
        Ok(Self {
            start_z,
            end_z,
            step_z,
        })
    }

    pub fn start_z(&self) -> f64 {
        self.start_z
    }

    pub fn end_z(&self) -> f64 {
        self.end_z
    }

    pub fn step_z(&self) -> f64 {
        self.step_z
    }

    /// The same range cut as a single plunge: the end is forced to exactly one
    /// step below the start.
    pub fn single_plunge(&self) -> Self {
        Self {
            start_z: self.start_z,
            end_z: self.start_z - self.step_z,
            step_z: self.step_z,
        }
    }

    /// Z of every pass, shallowest first.
    ///
    /// Each depth is computed as `start - k * step` and rounded to output
    /// precision before the comparison with `end`, so repeated floating point
    /// subtraction can not drop the last pass.
    pub fn pass_depths(&self) -> Vec<f64> {
        let end = round_value(self.end_z);
        let mut depths = Vec::new();
        for k in 0..MAX_DEPTH_PASSES {
            let z = round_value(self.start_z - k as f64 * self.step_z);
            if z < end {
                break;
            }
            depths.push(z);
        }
        depths
    }
}
