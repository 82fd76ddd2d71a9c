//! # Millpath
//!
//! Turns 2D machining shape descriptions into multi-pass G-code for CNC
//! routers.
//!
//! ## Architecture
//!
//! Millpath is organized as a workspace with multiple crates:
//!
//! 1. **millpath-core** - Points, depth ranges, tools, errors, program ledger
//! 2. **millpath-settings** - Configuration model and persistence
//! 3. **millpath-designer** - Shapes, tessellation, pocketing, G-code emission
//! 4. **millpath** - Command line front end that ties the crates together

use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};

pub use millpath_core::{
    ControlPoint, DepthRange, Error, EventDispatcher, Point, PointRole, Program, ProgramEvent,
    ProgramLine, Result, ShapeError, Tool, ToolRegistry,
};
pub use millpath_designer as designer;
pub use millpath_designer::{GenerationReport, ProgramGenerator, ShapeDocument, ShapeNode};
pub use millpath_settings::{Config, ErrorPolicy, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, so a program written to stdout stays clean
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

/// Loads the configuration to run with.
///
/// An explicit path must exist. Without one, the platform default path is
/// used when present, and built-in defaults otherwise.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match Config::default_path() {
            Ok(default) if default.exists() => {
                tracing::debug!("Using config {}", default.display());
                Config::load_from_file(&default)
                    .with_context(|| format!("Failed to load config {}", default.display()))?
            }
            _ => Config::default(),
        },
    };
    config.validate()?;
    Ok(config)
}

/// Runs one generation pass over a JSON shape document.
///
/// The program is written to `output`, or to stdout when no path is given.
pub fn generate_file(
    input: &Path,
    config: &Config,
    output: Option<&Path>,
) -> anyhow::Result<GenerationReport> {
    let document = ShapeDocument::load(input)
        .with_context(|| format!("Failed to read shapes {}", input.display()))?;
    let generator = ProgramGenerator::from_config(config)?;

    let mut program = Program::new();
    let report = generator
        .generate(&document, &mut program)
        .with_context(|| format!("Generation failed for {}", input.display()))?;

    let gcode = program.to_gcode();
    match output {
        Some(path) => {
            std::fs::write(path, &gcode)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} lines to {}", program.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(gcode.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(report)
}

/// Writes the default configuration to `path`, in JSON or TOML by extension.
pub fn init_config(path: &Path) -> anyhow::Result<PathBuf> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    Config::default().save_to_file(path)?;
    Ok(path.to_path_buf())
}
