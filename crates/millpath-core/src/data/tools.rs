//! Tool definitions and the named tool registry
//!
//! Shapes reference cutters by name; the registry resolves those names to a
//! [`Tool`] whose radius drives pocket stepover and inward offsets.

use crate::error::ShapeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A cutting tool, described by its diameter in millimetres.
///
/// The radius is always derived from the diameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    diameter: f64,
}

impl Tool {
    /// Creates a tool, rejecting a non-positive or non-finite diameter.
    pub fn new(diameter: f64) -> Result<Self, ShapeError> {
        if !diameter.is_finite() || diameter <= 0.0 {
            return Err(ShapeError::invalid_argument(
                "tool",
                "diameter",
                format!("must be > 0, got {diameter}"),
            ));
        }
        Ok(Self { diameter })
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}mm cutter", self.diameter)
    }
}

/// Named tool-diameter registry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Tool>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `(name, diameter)` pairs, validating every diameter.
    pub fn from_diameters<'a, I>(entries: I) -> Result<Self, ShapeError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut registry = Self::new();
        for (name, diameter) in entries {
            let tool = Tool::new(diameter).map_err(|e| e.with_shape(format!("tool '{name}'")))?;
            registry.insert(name, tool);
        }
        Ok(registry)
    }

    /// Add or replace a tool
    pub fn insert(&mut self, name: impl Into<String>, tool: Tool) {
        self.tools.insert(name.into(), tool);
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Resolve a tool reference made by `shape`, failing for unknown names.
    pub fn resolve(&self, shape: &str, name: &str) -> Result<Tool, ShapeError> {
        self.get(name).copied().ok_or_else(|| {
            ShapeError::invalid_argument(shape, "tool", format!("unknown tool '{name}'"))
        })
    }

    /// Registered tool names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
