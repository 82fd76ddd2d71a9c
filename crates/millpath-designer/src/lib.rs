//! # Millpath Designer
//!
//! Turns a tree of 2D shape descriptors into toolpaths and a multi-pass
//! G-code program.
//!
//! ## Pipeline
//!
//! ```text
//! ShapeDocument (descriptor tree)
//!   └── Shape::extract / Shape::execute (per kind)
//!         ├── tessellate (Bezier runs, through-point splines)
//!         ├── pocket_operations (scanline interior fill)
//!         └── font_manager (glyph outlines for text)
//!   └── GcodeEmitter (differential motion lines, serpentine passes)
//!         └── Program (ledger, from millpath-core)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use millpath_core::Program;
//! use millpath_designer::{ProgramGenerator, ShapeDocument};
//!
//! let generator = ProgramGenerator::from_config(&config)?;
//! let mut program = Program::new();
//! let report = generator.generate(&document, &mut program)?;
//! println!("{}", program.to_gcode());
//! ```

pub mod descriptor;
pub mod font_manager;
pub mod gcode_gen;
pub mod generator;
pub mod model;
pub mod pocket_operations;
pub mod tessellate;
pub mod toolpath;

pub use descriptor::{ChildNode, NodeKind, NodeReader, ShapeDocument, ShapeNode};
pub use font_manager::{FontSpec, FontStyle, GlyphOutliner, GlyphRequest, SystemFontOutliner};
pub use gcode_gen::GcodeEmitter;
pub use generator::{
    GenerationReport, GeneratorSettings, ProgramGenerator, ShapeReport, SkippedShape,
};
pub use model::{
    CircleShape, DrillShape, LineShape, PolylineShape, RectangleShape, Shape, ShapeContext,
    TextShape,
};
pub use pocket_operations::PocketGenerator;
pub use toolpath::{PathKind, ShapeToolpaths, ToolPath};

pub use millpath_core::{ControlPoint, DepthRange, Point, PointRole, Tool, ToolRegistry};
