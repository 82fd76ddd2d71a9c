use crate::descriptor::{parse_number, NodeReader};
use crate::toolpath::{ShapeToolpaths, ToolPath};
use millpath_core::{DepthRange, Point, ShapeError, ShapeResult, Tool};
use std::f64::consts::TAU;

use super::{read_pocket_tool, ShapeContext};

/// Largest angular step used when the step comes from the chord resolution.
const MAX_ANGLE_STEP: f64 = 0.5;

/// Upper bound on the number of samples a single circle may produce.
pub const MAX_CIRCLE_SAMPLES: usize = 100_000;

/// A full circle sampled from angle 0, closed on its first point.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    pub name: String,
    pub center: Point,
    pub radius: f64,
    /// Explicit segment count, at least 3
    pub segments: Option<usize>,
    /// Target chord length used when `segments` is unset
    pub resolution: f64,
    pub depth: DepthRange,
    pub pocket: Option<Tool>,
}

impl CircleShape {
    pub fn extract(reader: &NodeReader<'_>, ctx: &ShapeContext<'_>) -> ShapeResult<Self> {
        let shape = reader.shape();
        let center = reader.pair("center")?;
        let radius = reader.scalar("radius")?;
        if radius <= 0.0 {
            return Err(ShapeError::invalid_argument(
                shape,
                "radius",
                format!("must be > 0, got {radius}"),
            ));
        }

        let segments = match reader.attribute("segments") {
            Some(text) => Some(parse_segments(text, shape)?),
            None => None,
        };

        let depth = reader.depth()?;
        let pocket = read_pocket_tool(reader, ctx)?;
        let circle = Self {
            name: shape.to_string(),
            center: ctx.translate(center),
            radius,
            segments,
            resolution: ctx.circle_resolution,
            depth,
            pocket,
        };

        let samples = circle.sample_count();
        if segments.is_none() && samples.is_none_or(|n| n > MAX_CIRCLE_SAMPLES) {
            return Err(ShapeError::invalid_argument(
                shape,
                "radius",
                format!(
                    "{radius} needs more than {MAX_CIRCLE_SAMPLES} samples at resolution {}",
                    circle.resolution
                ),
            ));
        }
        Ok(circle)
    }

    /// Angular step between consecutive points.
    pub fn angle_step(&self) -> f64 {
        match self.segments {
            Some(n) => TAU / n as f64,
            None => MAX_ANGLE_STEP.min(TAU / (TAU * self.radius / self.resolution)),
        }
    }

    /// Number of distinct samples, or `None` when the step does not give a
    /// finite count.
    pub fn sample_count(&self) -> Option<usize> {
        if let Some(n) = self.segments {
            return Some(n);
        }
        let count = (TAU / self.angle_step() - 1e-9).ceil();
        (count.is_finite() && count >= 1.0 && count <= MAX_CIRCLE_SAMPLES as f64)
            .then_some(count as usize)
    }

    /// Sample points; the last point is an exact copy of the first.
    pub fn points(&self) -> Vec<Point> {
        let step = self.angle_step();
        let count = self.sample_count().unwrap_or(0);

        let mut points: Vec<Point> = (0..count)
            .map(|k| {
                let angle = k as f64 * step;
                Point::new(
                    self.center.x + self.radius * angle.cos(),
                    self.center.y + self.radius * angle.sin(),
                )
            })
            .collect();
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
        points
    }

    pub fn execute(&self, ctx: &ShapeContext<'_>) -> ShapeToolpaths {
        let mut paths = ShapeToolpaths::single(ToolPath::new(&self.name, self.points()));
        if let Some(tool) = &self.pocket {
            let pocket = ctx.pocket.generate(
                format!("{} pocket", self.name),
                &paths.primary[0].points,
                &[],
                tool,
            );
            paths.pockets.push(pocket);
        }
        paths
    }
}

fn parse_segments(text: &str, shape: &str) -> ShapeResult<usize> {
    let value = parse_number(text, shape, "segments")?;
    if value.fract() != 0.0 {
        return Err(ShapeError::invalid_number(shape, "segments", text));
    }
    if value < 3.0 {
        return Err(ShapeError::invalid_argument(
            shape,
            "segments",
            format!("must be at least 3, got {value}"),
        ));
    }
    if value > MAX_CIRCLE_SAMPLES as f64 {
        return Err(ShapeError::invalid_argument(
            shape,
            "segments",
            format!("{value} exceeds the limit of {MAX_CIRCLE_SAMPLES}"),
        ));
    }
    Ok(value as usize)
}
