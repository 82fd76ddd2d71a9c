//! Millpath Settings Crate
//!
//! Handles the read-only configuration a generation pass consumes: machine
//! safety height, geometry resolution, pocket scan constants, program
//! fragments, error policy, and the named tool registry.

pub mod config;
pub mod error;

pub use config::{
    Config, ErrorPolicy, FragmentSettings, GenerationSettings, GeometrySettings, MachineSettings,
    PocketSettings,
};
pub use error::{SettingsError, SettingsResult};
