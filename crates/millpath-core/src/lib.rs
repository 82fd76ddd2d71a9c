//! # Millpath Core
//!
//! Core types, errors, and the program ledger shared by every Millpath crate.
//! Provides the fundamental data model (points, control points, depth ranges,
//! tools), the shape error taxonomy, and the ordered line/field program that a
//! generation pass rebuilds.

pub mod data;
pub mod error;
pub mod event;
pub mod program;

pub use event::{EventDispatcher, ProgramEvent};

pub use data::tools::{Tool, ToolRegistry};
pub use data::{ControlPoint, DepthRange, Point, PointRole};

pub use error::{Error, Result, ShapeError, ShapeResult};

pub use program::{format_number, round_value, Field, Program, ProgramLine};
