use crate::descriptor::NodeReader;
use crate::toolpath::{ShapeToolpaths, ToolPath};
use millpath_core::{DepthRange, Point, ShapeResult};

use super::ShapeContext;

/// A straight cut between two anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    pub name: String,
    pub start: Point,
    pub end: Point,
    pub depth: DepthRange,
}

impl LineShape {
    pub fn extract(reader: &NodeReader<'_>, ctx: &ShapeContext<'_>) -> ShapeResult<Self> {
        let points = reader.pairs("point", 2)?;
        let depth = reader.depth()?;
        Ok(Self {
            name: reader.shape().to_string(),
            start: ctx.translate(points[0]),
            end: ctx.translate(points[1]),
            depth,
        })
    }

    pub fn execute(&self) -> ShapeToolpaths {
        ShapeToolpaths::single(ToolPath::new(&self.name, vec![self.start, self.end]))
    }
}
