//! Configuration system for the survey overlay.
//!
//! Settings persist to disk as RON files. Supports layered loading (shipped
//! base file, then the user's saved file), CLI overrides via clap, hot-reload
//! detection, and a built-in failsafe resource set for when nothing usable
//! can be read.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, CliScale};
pub use config::{
    BodyConfig, CONFIG_FILE_NAME, Config, DebugConfig, FieldConfig, OverlayConfig,
    ResourceConfig, ResourceOverlayConfig, ScaleMode,
};
pub use error::ConfigError;
