use crate::descriptor::NodeReader;
use crate::font_manager::{FontSpec, FontStyle, GlyphRequest};
use crate::pocket_operations::{area, contains_point};
use crate::toolpath::{ShapeToolpaths, ToolPath};
use millpath_core::{DepthRange, Point, Result, ShapeError, ShapeResult, Tool};

use super::{read_pocket_tool, ShapeContext};

/// Default flattening tolerance for glyph curves, in mm.
pub const DEFAULT_FLATNESS: f64 = 0.1;

/// Text cut along its glyph outlines, starting at a baseline point.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    pub name: String,
    pub origin: Point,
    pub content: String,
    pub font: FontSpec,
    pub flatness: f64,
    pub depth: DepthRange,
    pub pocket: Option<Tool>,
}

impl TextShape {
    pub fn extract(reader: &NodeReader<'_>, ctx: &ShapeContext<'_>) -> ShapeResult<Self> {
        let shape = reader.shape();
        let origin = reader.pair("position")?;
        let content = reader.required("content")?.to_string();

        let defaults = FontSpec::default();
        let family = reader
            .attribute("font")
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.family);

        let size = reader.attribute_number("size")?.unwrap_or(defaults.size);
        if size <= 0.0 {
            return Err(ShapeError::invalid_argument(
                shape,
                "size",
                format!("must be > 0, got {size}"),
            ));
        }

        let style = match reader.attribute("style") {
            Some(text) => text
                .parse::<FontStyle>()
                .map_err(|reason| ShapeError::invalid_argument(shape, "style", reason))?,
            None => defaults.style,
        };

        let flatness = reader
            .attribute_number("flatness")?
            .unwrap_or(DEFAULT_FLATNESS);
        if flatness <= 0.0 {
            return Err(ShapeError::invalid_argument(
                shape,
                "flatness",
                format!("must be > 0, got {flatness}"),
            ));
        }

        let depth = reader.depth()?;
        let pocket = read_pocket_tool(reader, ctx)?;
        Ok(Self {
            name: shape.to_string(),
            origin: ctx.translate(origin),
            content,
            font: FontSpec {
                family,
                size,
                style,
            },
            flatness,
            depth,
            pocket,
        })
    }

    pub fn execute(&self, ctx: &ShapeContext<'_>) -> Result<ShapeToolpaths> {
        let request = GlyphRequest {
            text: &self.content,
            font: &self.font,
            flatness: self.flatness,
        };
        let contours: Vec<Vec<Point>> = ctx
            .outliner
            .outline(&request)?
            .into_iter()
            .map(|glyph| self.to_machine(glyph))
            .filter(|c| c.len() >= 2)
            .collect();
        tracing::debug!(
            "Text '{}' produced {} contours",
            self.content,
            contours.len()
        );

        let mut paths = ShapeToolpaths::default();
        for (k, contour) in contours.iter().enumerate() {
            paths.primary.push(ToolPath::new(
                format!("{} contour {}", self.name, k + 1),
                contour.clone(),
            ));
        }

        if let Some(tool) = &self.pocket {
            for (k, island) in classify(&contours).iter().enumerate() {
                let holes: Vec<Vec<Point>> =
                    island.holes.iter().map(|&h| contours[h].clone()).collect();
                paths.pockets.push(ctx.pocket.generate(
                    format!("{} pocket {}", self.name, k + 1),
                    &contours[island.outer],
                    &holes,
                    tool,
                ));
            }
        }
        Ok(paths)
    }

    /// Glyph space (y down, baseline origin) to machine space, closed.
    fn to_machine(&self, glyph: Vec<Point>) -> Vec<Point> {
        let mut points: Vec<Point> = glyph
            .into_iter()
            .map(|g| Point::new(self.origin.x + g.x, self.origin.y - g.y))
            .collect();
        if let (Some(first), Some(last)) = (points.first().copied(), points.last()) {
            if first != *last {
                points.push(first);
            }
        }
        points
    }
}

/// An outer contour and the holes directly inside it, by contour index.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Island {
    pub outer: usize,
    pub holes: Vec<usize>,
}

/// Splits closed contours into outers and holes by even-odd nesting, pairing
/// every hole with the smallest outer that encloses it.
pub(crate) fn classify(contours: &[Vec<Point>]) -> Vec<Island> {
    let nesting = |i: usize| {
        contours
            .iter()
            .enumerate()
            .filter(|&(j, other)| j != i && contains_point(&contours[i][0], std::slice::from_ref(other)))
            .count()
    };

    let mut islands: Vec<Island> = Vec::new();
    let mut holes = Vec::new();
    for i in 0..contours.len() {
        if nesting(i) % 2 == 0 {
            islands.push(Island {
                outer: i,
                holes: Vec::new(),
            });
        } else {
            holes.push(i);
        }
    }

    for hole in holes {
        let probe = contours[hole][0];
        let parent = islands
            .iter_mut()
            .filter(|island| contains_point(&probe, std::slice::from_ref(&contours[island.outer])))
            .min_by(|a, b| {
                area(&contours[a.outer]).total_cmp(&area(&contours[b.outer]))
            });
        if let Some(island) = parent {
            island.holes.push(hole);
        }
    }
    islands
}
