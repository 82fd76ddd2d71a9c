//! Glyph outlines for text shapes.
//!
//! Text is cut along the outlines of a system font. Fonts are found with
//! `fontdb`, laid out with `rusttype`, and each glyph outline is flattened
//! with `lyon` at the requested tolerance. Outlines are returned in glyph
//! space (y grows downwards, origin on the baseline).

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::Path;
use millpath_core::{Error, Point, Result};
use rusttype::{point as rt_point, Font, OutlineBuilder, Scale};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, OnceLock};

/// Weight and slant of a font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Plain,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn is_bold(&self) -> bool {
        matches!(self, Self::Bold | Self::BoldItalic)
    }

    pub fn is_italic(&self) -> bool {
        matches!(self, Self::Italic | Self::BoldItalic)
    }
}

impl FromStr for FontStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "regular" => Ok(Self::Plain),
            "bold" => Ok(Self::Bold),
            "italic" => Ok(Self::Italic),
            "bold-italic" | "bolditalic" => Ok(Self::BoldItalic),
            other => Err(format!("unknown font style '{other}'")),
        }
    }
}

impl std::fmt::Display for FontStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Bold => write!(f, "bold"),
            Self::Italic => write!(f, "italic"),
            Self::BoldItalic => write!(f, "bold-italic"),
        }
    }
}

/// Font family, size (mm), and style of a text shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub style: FontStyle,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            size: 10.0,
            style: FontStyle::Plain,
        }
    }
}

/// What to outline and how finely.
#[derive(Debug, Clone, Copy)]
pub struct GlyphRequest<'a> {
    pub text: &'a str,
    pub font: &'a FontSpec,
    /// Maximum distance between a flattened outline and the true curve
    pub flatness: f64,
}

/// Source of flattened glyph outlines.
///
/// Returns every contour of every glyph in layout order, in glyph space.
pub trait GlyphOutliner {
    fn outline(&self, request: &GlyphRequest<'_>) -> Result<Vec<Vec<Point>>>;
}

#[derive(Clone, Eq, PartialEq, Hash)]
struct FontKey {
    family: String,
    bold: bool,
    italic: bool,
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());
        db
    })
}

/// Outlines text with installed system fonts.
///
/// There is no bundled fallback; a family with no matching face is an
/// [`Error::Outline`].
#[derive(Default)]
pub struct SystemFontOutliner {
    cache: Mutex<HashMap<FontKey, Arc<Font<'static>>>>,
}

impl SystemFontOutliner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted names of every installed font family.
    pub fn list_font_families() -> Vec<String> {
        let mut names: Vec<String> = db()
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn font_for(&self, spec: &FontSpec) -> Result<Arc<Font<'static>>> {
        let key = FontKey {
            family: spec.family.clone(),
            bold: spec.style.is_bold(),
            italic: spec.style.is_italic(),
        };

        let mut cache = self.cache.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(font) = cache.get(&key) {
            return Ok(Arc::clone(font));
        }

        let font = load_font_from_system(&key.family, key.bold, key.italic).ok_or_else(|| {
            Error::outline(format!(
                "no installed font matches '{}' ({})",
                spec.family, spec.style
            ))
        })?;
        let font = Arc::new(font);
        cache.insert(key, Arc::clone(&font));
        Ok(font)
    }
}

impl GlyphOutliner for SystemFontOutliner {
    fn outline(&self, request: &GlyphRequest<'_>) -> Result<Vec<Vec<Point>>> {
        let font = self.font_for(request.font)?;
        let scale = Scale::uniform(request.font.size as f32);
        let tolerance = request.flatness as f32;

        let mut contours = Vec::new();
        for glyph in font.layout(request.text, scale, rt_point(0.0, 0.0)) {
            let mut builder = LyonOutline::new();
            if !glyph.build_outline(&mut builder) {
                // Whitespace and other glyphs without an outline.
                continue;
            }
            contours.extend(flatten(&builder.finish(), tolerance));
        }
        Ok(contours)
    }
}

fn load_font_from_system(family: &str, bold: bool, italic: bool) -> Option<Font<'static>> {
    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" => vec![Family::SansSerif],
        "Serif" => vec![Family::Serif],
        "Monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other)],
    };

    let query = Query {
        families: &families,
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: if italic { Style::Italic } else { Style::Normal },
    };

    let id = db().query(&query)?;
    let face = db().face(id)?;

    let font = match &face.source {
        fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
            let bytes = std::fs::read(path).ok()?;
            Font::try_from_vec_and_index(bytes, face.index)
        }
        fontdb::Source::Binary(bytes) => {
            Font::try_from_vec_and_index(bytes.as_ref().as_ref().to_vec(), face.index)
        }
    };
    if font.is_none() {
        tracing::warn!("Font face for '{}' could not be parsed", family);
    }
    font
}

/// Collects a rusttype glyph outline into a lyon path.
struct LyonOutline {
    builder: lyon::path::path::Builder,
    open: bool,
}

impl LyonOutline {
    fn new() -> Self {
        Self {
            builder: Path::builder(),
            open: false,
        }
    }

    fn finish(mut self) -> Path {
        if self.open {
            self.builder.end(false);
        }
        self.builder.build()
    }
}

impl OutlineBuilder for LyonOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        if self.open {
            self.builder.end(false);
        }
        self.builder.begin(point(x, y));
        self.open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(point(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quadratic_bezier_to(point(x1, y1), point(x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder
            .cubic_bezier_to(point(x1, y1), point(x2, y2), point(x, y));
    }

    fn close(&mut self) {
        if self.open {
            self.builder.end(true);
            self.open = false;
        }
    }
}

/// Flattens a lyon path into closed point contours.
fn flatten(path: &Path, tolerance: f32) -> Vec<Vec<Point>> {
    let mut contours = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for event in path.iter().flattened(tolerance) {
        match event {
            lyon::path::Event::Begin { at } => {
                current.clear();
                current.push(Point::new(at.x as f64, at.y as f64));
            }
            lyon::path::Event::Line { to, .. } => {
                current.push(Point::new(to.x as f64, to.y as f64));
            }
            lyon::path::Event::End { first, .. } => {
                let first = Point::new(first.x as f64, first.y as f64);
                if current.last() != Some(&first) {
                    current.push(first);
                }
                if current.len() >= 4 {
                    contours.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
            _ => {}
        }
    }
    contours
}
