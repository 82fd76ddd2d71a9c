//! Shape descriptor tree
//!
//! The parsed input handed to a generation pass: typed nodes carrying a kind
//! tag, ordered raw-text children, string attributes, and (for `translate`)
//! nested nodes. Nothing here is validated beyond the kind tag; shapes read
//! their parameters through [`NodeReader`], which reports precise
//! [`ShapeError`]s.

use millpath_core::{DepthRange, Error, Point, Result, ShapeError, ShapeResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Kind tag of a descriptor node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Line,
    Polyline,
    Circle,
    Rectangle,
    Drill,
    Text,
    Translate,
    /// Any tag this version does not know; skipped by the generator
    #[serde(other)]
    Unsupported,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Line => "line",
            Self::Polyline => "polyline",
            Self::Circle => "circle",
            Self::Rectangle => "rectangle",
            Self::Drill => "drill",
            Self::Text => "text",
            Self::Translate => "translate",
            Self::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// A named raw-text child of a node, such as `point = "10,20"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildNode {
    pub name: String,
    pub value: String,
}

/// One node of the descriptor tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeNode {
    pub kind: NodeKind,
    /// Optional label used to name the node's toolpaths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildNode>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Nested nodes of a `translate` scope
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<ShapeNode>,
}

impl ShapeNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            nodes: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a raw-text child.
    pub fn child(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.children.push(ChildNode {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Appends a nested node.
    pub fn node(mut self, node: ShapeNode) -> Self {
        self.nodes.push(node);
        self
    }
}

/// Root of a descriptor tree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeDocument {
    #[serde(default)]
    pub nodes: Vec<ShapeNode>,
}

impl ShapeDocument {
    pub fn new(nodes: Vec<ShapeNode>) -> Self {
        Self { nodes }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::other(format!("Invalid shape document: {e}")))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::other(format!("Failed to serialize shape document: {e}")))
    }

    /// Reads a JSON document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Typed access to a node's raw parameters on behalf of a named shape.
pub struct NodeReader<'a> {
    node: &'a ShapeNode,
    shape: &'a str,
}

impl<'a> NodeReader<'a> {
    pub fn new(node: &'a ShapeNode, shape: &'a str) -> Self {
        Self { node, shape }
    }

    pub fn shape(&self) -> &str {
        self.shape
    }

    /// Values of every child called `name`, in document order.
    pub fn values(&self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.node
            .children
            .iter()
            .filter(move |c| c.name == name)
            .map(|c| c.value.as_str())
    }

    /// Every child in document order.
    pub fn entries(&self) -> impl Iterator<Item = &'a ChildNode> + 'a {
        self.node.children.iter()
    }

    pub fn required(&self, name: &str) -> ShapeResult<&'a str> {
        self.node
            .children
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
            .ok_or_else(|| ShapeError::missing(self.shape, name))
    }

    pub fn pair(&self, name: &str) -> ShapeResult<Point> {
        parse_pair(self.required(name)?, self.shape, name)
    }

    /// Exactly `count` pairs called `name`.
    pub fn pairs(&self, name: &'a str, count: usize) -> ShapeResult<Vec<Point>> {
        let points = self
            .values(name)
            .take(count)
            .map(|text| parse_pair(text, self.shape, name))
            .collect::<ShapeResult<Vec<_>>>()?;
        if points.len() < count {
            return Err(ShapeError::missing(self.shape, name));
        }
        Ok(points)
    }

    pub fn scalar(&self, name: &str) -> ShapeResult<f64> {
        parse_number(self.required(name)?, self.shape, name)
    }

    /// The `depth` child as a validated depth range.
    pub fn depth(&self) -> ShapeResult<DepthRange> {
        let text = self.required("depth")?;
        let parts = split_numbers(text, 3, self.shape, "depth")?;
        DepthRange::new(parts[0], parts[1], parts[2]).map_err(|e| e.with_shape(self.shape))
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.node.attributes.get(name).map(|s| s.trim())
    }

    pub fn attribute_number(&self, name: &str) -> ShapeResult<Option<f64>> {
        self.attribute(name)
            .map(|text| parse_number(text, self.shape, name))
            .transpose()
    }

    /// Whether an attribute is set to `true`, `yes`, or `1`.
    pub fn flag(&self, name: &str) -> bool {
        self.attribute(name).is_some_and(|value| {
            matches!(value.to_ascii_lowercase().as_str(), "true" | "yes" | "1")
        })
    }
}

/// Parses `"x,y"` into a point.
pub fn parse_pair(text: &str, shape: &str, parameter: &str) -> ShapeResult<Point> {
    let parts = split_numbers(text, 2, shape, parameter)?;
    Ok(Point::new(parts[0], parts[1]))
}

/// Parses a single finite number.
pub fn parse_number(text: &str, shape: &str, parameter: &str) -> ShapeResult<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ShapeError::invalid_number(shape, parameter, text))
}

fn split_numbers(
    text: &str,
    count: usize,
    shape: &str,
    parameter: &str,
) -> ShapeResult<Vec<f64>> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != count {
        return Err(ShapeError::invalid_number(shape, parameter, text));
    }
    parts
        .iter()
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ShapeError::invalid_number(shape, parameter, text))
        })
        .collect()
}
