//! Configuration for Millpath
//!
//! Provides configuration file handling and validation. Supports JSON and TOML
//! file formats; the default location is the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - Machine settings (safety height)
//! - Geometry settings (circle chord resolution)
//! - Pocket settings (scanline step and edge margin)
//! - Program fragments (prologue and epilogue files)
//! - Generation settings (error policy)
//! - Named tool diameters

use crate::error::{SettingsError, SettingsResult};
use millpath_core::{ShapeError, ToolRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Machine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// Z height used for rapid repositioning, in mm
    pub safety_height: f64,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self { safety_height: 5.0 }
    }
}

/// Geometry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    /// Target chord length for circles without an explicit segment count, in mm
    pub circle_resolution: f64,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            circle_resolution: 2.0,
        }
    }
}

/// Pocket scanline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PocketSettings {
    /// Distance between containment samples along a scanline, in mm
    pub scan_step: f64,
    /// How far past the bounding box each scanline starts and ends, in mm
    pub edge_margin: f64,
}

impl Default for PocketSettings {
    fn default() -> Self {
        Self {
            scan_step: 0.1,
            edge_margin: 0.1,
        }
    }
}

/// Program fragment files spliced around the generated body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prologue: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epilogue: Option<PathBuf>,
}

/// What a generation pass does when a shape fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Stop at the first failing shape, keeping what was already committed
    #[default]
    Abort,
    /// Log the failing shape and continue with the next one
    SkipShape,
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::SkipShape => write!(f, "skip-shape"),
        }
    }
}

/// Generation pass settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub error_policy: ErrorPolicy,
}

/// Complete configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Machine settings
    pub machine: MachineSettings,
    /// Geometry settings
    pub geometry: GeometrySettings,
    /// Pocket settings
    pub pocket: PocketSettings,
    /// Program fragments
    pub fragments: FragmentSettings,
    /// Generation settings
    pub generation: GenerationSettings,
    /// Tool name to diameter (mm)
    pub tools: BTreeMap<String, f64>,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location, `<config dir>/millpath/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("millpath").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if !self.machine.safety_height.is_finite() {
            return Err(SettingsError::invalid(
                "machine.safety_height",
                "must be a finite number",
            ));
        }

        if !is_positive(self.geometry.circle_resolution) {
            return Err(SettingsError::invalid(
                "geometry.circle_resolution",
                "must be > 0",
            ));
        }

        if !is_positive(self.pocket.scan_step) {
            return Err(SettingsError::invalid("pocket.scan_step", "must be > 0"));
        }

        if !(self.pocket.edge_margin.is_finite() && self.pocket.edge_margin >= 0.0) {
            return Err(SettingsError::invalid("pocket.edge_margin", "must be >= 0"));
        }

        for (name, diameter) in &self.tools {
            if !is_positive(*diameter) {
                return Err(SettingsError::invalid(
                    format!("tools.{name}"),
                    "diameter must be > 0",
                ));
            }
        }

        Ok(())
    }

    /// Build the named tool registry from the `tools` section
    pub fn tool_registry(&self) -> Result<ToolRegistry, ShapeError> {
        ToolRegistry::from_diameters(self.tools.iter().map(|(name, d)| (name.as_str(), *d)))
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
