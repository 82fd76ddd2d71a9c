//! Shape kinds and their two-phase build.
//!
//! Every kind is read from a descriptor node in an extract step, which
//! validates all parameters and applies the active translation, and then
//! turned into toolpaths by an execute step that only sees validated state.

mod circle;
mod drill;
mod line;
mod polyline;
mod rectangle;
mod text;

pub use circle::{CircleShape, MAX_CIRCLE_SAMPLES};
pub use drill::DrillShape;
pub use line::LineShape;
pub use polyline::PolylineShape;
pub use rectangle::RectangleShape;
pub use text::TextShape;

use crate::descriptor::{NodeKind, NodeReader, ShapeNode};
use crate::font_manager::GlyphOutliner;
use crate::pocket_operations::PocketGenerator;
use crate::toolpath::ShapeToolpaths;
use millpath_core::{DepthRange, Point, Result, ShapeError, ShapeResult, Tool, ToolRegistry};

/// Default chord length for circles without an explicit segment count, in mm.
pub const DEFAULT_CIRCLE_RESOLUTION: f64 = 2.0;

/// Everything a shape needs from its surroundings during a pass.
pub struct ShapeContext<'a> {
    pub tools: &'a ToolRegistry,
    pub outliner: &'a dyn GlyphOutliner,
    pub circle_resolution: f64,
    pub pocket: PocketGenerator,
    offsets: Vec<Point>,
}

impl<'a> ShapeContext<'a> {
    pub fn new(tools: &'a ToolRegistry, outliner: &'a dyn GlyphOutliner) -> Self {
        Self {
            tools,
            outliner,
            circle_resolution: DEFAULT_CIRCLE_RESOLUTION,
            pocket: PocketGenerator::default(),
            offsets: Vec::new(),
        }
    }

    pub fn with_circle_resolution(mut self, resolution: f64) -> Self {
        self.circle_resolution = resolution;
        self
    }

    pub fn with_pocket_generator(mut self, pocket: PocketGenerator) -> Self {
        self.pocket = pocket;
        self
    }

    /// The composed offset of every open translation scope.
    pub fn offset(&self) -> Point {
        self.offsets.last().copied().unwrap_or_default()
    }

    /// Opens a translation scope; offsets of nested scopes add up.
    pub fn push_offset(&mut self, delta: Point) {
        let composed = self.offset() + delta;
        self.offsets.push(composed);
    }

    /// Closes the innermost translation scope.
    pub fn pop_offset(&mut self) {
        self.offsets.pop();
    }

    /// Applies the active offset to a raw coordinate.
    pub fn translate(&self, point: Point) -> Point {
        let offset = self.offset();
        point.translated(offset.x, offset.y)
    }
}

/// A validated shape, ready to produce toolpaths.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line(LineShape),
    Polyline(PolylineShape),
    Circle(CircleShape),
    Rectangle(RectangleShape),
    Drill(DrillShape),
    Text(TextShape),
}

impl Shape {
    /// Reads and validates a shape node.
    ///
    /// Returns `None` for nodes that are not shapes (`translate` scopes and
    /// unsupported kinds).
    pub fn extract(node: &ShapeNode, name: &str, ctx: &ShapeContext<'_>) -> ShapeResult<Option<Self>> {
        let reader = NodeReader::new(node, name);
        let shape = match node.kind {
            NodeKind::Line => Shape::Line(LineShape::extract(&reader, ctx)?),
            NodeKind::Polyline => Shape::Polyline(PolylineShape::extract(&reader, ctx)?),
            NodeKind::Circle => Shape::Circle(CircleShape::extract(&reader, ctx)?),
            NodeKind::Rectangle => Shape::Rectangle(RectangleShape::extract(&reader, ctx)?),
            NodeKind::Drill => Shape::Drill(DrillShape::extract(&reader, ctx)?),
            NodeKind::Text => Shape::Text(TextShape::extract(&reader, ctx)?),
            NodeKind::Translate | NodeKind::Unsupported => return Ok(None),
        };
        Ok(Some(shape))
    }

    /// Produces the shape's toolpaths.
    pub fn execute(&self, ctx: &ShapeContext<'_>) -> Result<ShapeToolpaths> {
        match self {
            Shape::Line(s) => Ok(s.execute()),
            Shape::Polyline(s) => s.execute(ctx),
            Shape::Circle(s) => Ok(s.execute(ctx)),
            Shape::Rectangle(s) => Ok(s.execute(ctx)),
            Shape::Drill(s) => Ok(s.execute()),
            Shape::Text(s) => s.execute(ctx),
        }
    }

    /// The depth range every path of this shape is cut with.
    pub fn depth(&self) -> DepthRange {
        match self {
            Shape::Line(s) => s.depth,
            Shape::Polyline(s) => s.depth,
            Shape::Circle(s) => s.depth,
            Shape::Rectangle(s) => s.depth,
            Shape::Drill(s) => s.depth,
            Shape::Text(s) => s.depth,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Shape::Line(s) => &s.name,
            Shape::Polyline(s) => &s.name,
            Shape::Circle(s) => &s.name,
            Shape::Rectangle(s) => &s.name,
            Shape::Drill(s) => &s.name,
            Shape::Text(s) => &s.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Shape::Line(_) => NodeKind::Line,
            Shape::Polyline(_) => NodeKind::Polyline,
            Shape::Circle(_) => NodeKind::Circle,
            Shape::Rectangle(_) => NodeKind::Rectangle,
            Shape::Drill(_) => NodeKind::Drill,
            Shape::Text(_) => NodeKind::Text,
        }
    }
}

/// Reads the `tool` and `pocket` attributes.
///
/// A named tool is always resolved; the pocket tool is returned only when
/// `pocket` is set, and then a tool is required.
pub(crate) fn read_pocket_tool(
    reader: &NodeReader<'_>,
    ctx: &ShapeContext<'_>,
) -> ShapeResult<Option<Tool>> {
    let tool = reader
        .attribute("tool")
        .map(|name| ctx.tools.resolve(reader.shape(), name))
        .transpose()?;
    if !reader.flag("pocket") {
        return Ok(None);
    }
    tool.map(Some)
        .ok_or_else(|| ShapeError::missing(reader.shape(), "tool"))
}
