use crate::descriptor::{parse_pair, NodeReader};
use crate::tessellate;
use crate::toolpath::{ShapeToolpaths, ToolPath};
use millpath_core::{ControlPoint, DepthRange, PointRole, Result, ShapeError, ShapeResult, Tool};

use super::{read_pocket_tool, ShapeContext};

/// A path mixing straight runs, Bezier runs, and through-point splines.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineShape {
    pub name: String,
    pub entries: Vec<ControlPoint>,
    pub depth: DepthRange,
    pub pocket: Option<Tool>,
}

impl PolylineShape {
    pub fn extract(reader: &NodeReader<'_>, ctx: &ShapeContext<'_>) -> ShapeResult<Self> {
        let shape = reader.shape();
        let mut entries = Vec::new();
        for child in reader.entries() {
            let role = match child.name.as_str() {
                "point" => PointRole::Anchor,
                "control" => PointRole::BezierControl,
                "through" => PointRole::SplineThrough,
                _ => continue,
            };
            let position = parse_pair(&child.value, shape, &child.name)?;
            entries.push(ControlPoint::new(ctx.translate(position), role));
        }

        // A Bezier run needs an on-curve point on both sides.
        let bounded = |entry: Option<&ControlPoint>| entry.is_some_and(|e| e.role.is_on_curve());
        if !bounded(entries.first()) || !bounded(entries.last()) {
            return Err(ShapeError::missing(shape, "point"));
        }

        let depth = reader.depth()?;
        let pocket = read_pocket_tool(reader, ctx)?;
        Ok(Self {
            name: shape.to_string(),
            entries,
            depth,
            pocket,
        })
    }

    pub fn execute(&self, ctx: &ShapeContext<'_>) -> Result<ShapeToolpaths> {
        let points = tessellate::polyline(&self.entries, &self.name)?;
        let mut paths = ShapeToolpaths::single(ToolPath::new(&self.name, points));
        if let Some(tool) = &self.pocket {
            let pocket = ctx.pocket.generate(
                format!("{} pocket", self.name),
                &paths.primary[0].points,
                &[],
                tool,
            );
            paths.pockets.push(pocket);
        }
        Ok(paths)
    }
}
