//! Generation pass.
//!
//! Walks a shape document in order, builds each shape's toolpaths, emits
//! them through one [`GcodeEmitter`], and commits each shape's lines to the
//! program ledger as a single batch once the whole shape has succeeded.

use crate::descriptor::{NodeKind, NodeReader, ShapeDocument, ShapeNode};
use crate::font_manager::{GlyphOutliner, SystemFontOutliner};
use crate::gcode_gen::GcodeEmitter;
use crate::model::{Shape, ShapeContext, DEFAULT_CIRCLE_RESOLUTION};
use crate::pocket_operations::PocketGenerator;
use crate::toolpath::ShapeToolpaths;
use millpath_core::{Error, Program, Result, ToolRegistry};
use millpath_settings::{Config, ErrorPolicy};
use std::path::{Path, PathBuf};

/// Read-only settings of a generation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    pub safety_height: f64,
    pub circle_resolution: f64,
    pub pocket: PocketGenerator,
    pub error_policy: ErrorPolicy,
    pub prologue: Option<PathBuf>,
    pub epilogue: Option<PathBuf>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            safety_height: 5.0,
            circle_resolution: DEFAULT_CIRCLE_RESOLUTION,
            pocket: PocketGenerator::default(),
            error_policy: ErrorPolicy::Abort,
            prologue: None,
            epilogue: None,
        }
    }
}

impl From<&Config> for GeneratorSettings {
    fn from(config: &Config) -> Self {
        Self {
            safety_height: config.machine.safety_height,
            circle_resolution: config.geometry.circle_resolution,
            pocket: PocketGenerator::new(config.pocket.scan_step, config.pocket.edge_margin),
            error_policy: config.generation.error_policy,
            prologue: config.fragments.prologue.clone(),
            epilogue: config.fragments.epilogue.clone(),
        }
    }
}

/// Toolpaths and line count of one committed shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeReport {
    pub name: String,
    pub kind: NodeKind,
    pub toolpaths: ShapeToolpaths,
    pub lines: usize,
}

/// A shape left out under [`ErrorPolicy::SkipShape`].
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedShape {
    pub name: String,
    pub reason: String,
}

/// Outcome of a successful pass, for preview collaborators.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationReport {
    pub shapes: Vec<ShapeReport>,
    pub skipped: Vec<SkippedShape>,
}

impl GenerationReport {
    pub fn line_count(&self) -> usize {
        self.shapes.iter().map(|s| s.lines).sum()
    }
}

/// Runs generation passes over shape documents.
pub struct ProgramGenerator {
    settings: GeneratorSettings,
    tools: ToolRegistry,
    outliner: Box<dyn GlyphOutliner>,
}

impl ProgramGenerator {
    /// Creates a generator that outlines text with system fonts.
    pub fn new(settings: GeneratorSettings, tools: ToolRegistry) -> Self {
        Self {
            settings,
            tools,
            outliner: Box::new(SystemFontOutliner::new()),
        }
    }

    /// Creates a generator from a validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let tools = config.tool_registry()?;
        Ok(Self::new(GeneratorSettings::from(config), tools))
    }

    /// Replaces the glyph outline source.
    pub fn with_outliner(mut self, outliner: impl GlyphOutliner + 'static) -> Self {
        self.outliner = Box::new(outliner);
        self
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Runs one pass: clears `program`, loads the fragments, then builds and
    /// commits every shape in document order.
    ///
    /// Under [`ErrorPolicy::Abort`] the first failing shape ends the pass and
    /// its error is returned; lines of earlier shapes stay in the program.
    /// The program always receives a `PassFinished` event.
    pub fn generate(&self, document: &ShapeDocument, program: &mut Program) -> Result<GenerationReport> {
        program.clear();
        program.set_prologue(load_fragment(self.settings.prologue.as_deref(), "prologue"));
        program.set_epilogue(load_fragment(self.settings.epilogue.as_deref(), "epilogue"));

        let mut pass = Pass {
            ctx: ShapeContext::new(&self.tools, self.outliner.as_ref())
                .with_circle_resolution(self.settings.circle_resolution)
                .with_pocket_generator(self.settings.pocket),
            emitter: GcodeEmitter::new(self.settings.safety_height),
            policy: self.settings.error_policy,
            report: GenerationReport::default(),
            counter: 0,
        };

        let result = pass.walk(&document.nodes, program);
        program.finish_pass(result.is_ok());

        match result {
            Ok(()) => {
                tracing::info!(
                    "Generated {} lines from {} shapes ({} skipped)",
                    program.len(),
                    pass.report.shapes.len(),
                    pass.report.skipped.len()
                );
                Ok(pass.report)
            }
            Err(e) => {
                tracing::error!("Generation aborted after {} lines: {}", program.len(), e);
                Err(e)
            }
        }
    }
}

/// State of one pass over the document.
struct Pass<'a> {
    ctx: ShapeContext<'a>,
    emitter: GcodeEmitter,
    policy: ErrorPolicy,
    report: GenerationReport,
    counter: usize,
}

impl Pass<'_> {
    fn walk(&mut self, nodes: &[ShapeNode], program: &mut Program) -> Result<()> {
        for node in nodes {
            match node.kind {
                NodeKind::Unsupported => {
                    tracing::debug!("Skipping unsupported node {:?}", node.name);
                }
                NodeKind::Translate => self.scope(node, program)?,
                _ => self.shape(node, program)?,
            }
        }
        Ok(())
    }

    fn scope(&mut self, node: &ShapeNode, program: &mut Program) -> Result<()> {
        let name = node.name.as_deref().unwrap_or("translate");
        let offset = match NodeReader::new(node, name).pair("offset") {
            Ok(offset) => offset,
            Err(e) => return self.fail(name, e.into()),
        };

        self.ctx.push_offset(offset);
        let result = self.walk(&node.nodes, program);
        self.ctx.pop_offset();
        result
    }

    fn shape(&mut self, node: &ShapeNode, program: &mut Program) -> Result<()> {
        self.counter += 1;
        let name = node
            .name
            .clone()
            .unwrap_or_else(|| format!("{} {}", node.kind, self.counter));

        let built = Shape::extract(node, &name, &self.ctx)
            .map_err(Error::from)
            .and_then(|shape| match shape {
                Some(shape) => shape.execute(&self.ctx).map(|paths| Some((shape, paths))),
                None => Ok(None),
            });

        let (shape, toolpaths) = match built {
            Ok(Some(built)) => built,
            Ok(None) => return Ok(()),
            Err(e) => return self.fail(&name, e),
        };

        let depth = shape.depth();
        let lines: Vec<_> = toolpaths
            .iter()
            .flat_map(|path| self.emitter.emit_path(path, &depth))
            .collect();
        tracing::debug!(
            "Shape '{}' produced {} paths and {} lines",
            name,
            toolpaths.len(),
            lines.len()
        );

        let count = lines.len();
        program.append(lines);
        self.report.shapes.push(ShapeReport {
            name,
            kind: shape.kind(),
            toolpaths,
            lines: count,
        });
        Ok(())
    }

    fn fail(&mut self, name: &str, error: Error) -> Result<()> {
        match self.policy {
            ErrorPolicy::Abort => Err(error),
            ErrorPolicy::SkipShape => {
                tracing::warn!("Skipping '{}': {}", name, error);
                self.report.skipped.push(SkippedShape {
                    name: name.to_string(),
                    reason: error.to_string(),
                });
                Ok(())
            }
        }
    }
}

/// Reads a program fragment; a missing or unreadable file is only a warning.
fn load_fragment(path: Option<&Path>, label: &str) -> Option<String> {
    let path = path?;
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!("Ignoring {} '{}': {}", label, path.display(), e);
            None
        }
    }
}
