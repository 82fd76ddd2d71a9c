use crate::descriptor::NodeReader;
use crate::toolpath::{ShapeToolpaths, ToolPath};
use millpath_core::{DepthRange, Point, ShapeResult};

use super::ShapeContext;

/// A single plunge at one point.
#[derive(Debug, Clone, PartialEq)]
pub struct DrillShape {
    pub name: String,
    pub position: Point,
    /// Always a single plunge: the end is one step below the start.
    pub depth: DepthRange,
}

impl DrillShape {
    pub fn extract(reader: &NodeReader<'_>, ctx: &ShapeContext<'_>) -> ShapeResult<Self> {
        let position = reader.pair("point")?;
        let depth = reader.depth()?.single_plunge();
        Ok(Self {
            name: reader.shape().to_string(),
            position: ctx.translate(position),
            depth,
        })
    }

    pub fn execute(&self) -> ShapeToolpaths {
        ShapeToolpaths::single(ToolPath::new(&self.name, vec![self.position]))
    }
}
