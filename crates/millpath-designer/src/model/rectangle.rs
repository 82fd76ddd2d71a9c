use crate::descriptor::NodeReader;
use crate::toolpath::{ShapeToolpaths, ToolPath};
use millpath_core::{DepthRange, Point, ShapeResult, Tool};

use super::{read_pocket_tool, ShapeContext};

/// An axis-aligned rectangle given by two opposite corners.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleShape {
    pub name: String,
    pub first: Point,
    pub second: Point,
    pub depth: DepthRange,
    pub pocket: Option<Tool>,
}

impl RectangleShape {
    pub fn extract(reader: &NodeReader<'_>, ctx: &ShapeContext<'_>) -> ShapeResult<Self> {
        let corners = reader.pairs("corner", 2)?;
        let depth = reader.depth()?;
        let pocket = read_pocket_tool(reader, ctx)?;
        Ok(Self {
            name: reader.shape().to_string(),
            first: ctx.translate(corners[0]),
            second: ctx.translate(corners[1]),
            depth,
            pocket,
        })
    }

    /// Corner sequence starting and ending at the first corner.
    pub fn points(&self) -> Vec<Point> {
        let (a, b) = (self.first, self.second);
        vec![a, Point::new(b.x, a.y), b, Point::new(a.x, b.y), a]
    }

    pub fn execute(&self, ctx: &ShapeContext<'_>) -> ShapeToolpaths {
        let outline = ToolPath::new(&self.name, self.points());
        let mut paths = ShapeToolpaths::single(outline);
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
