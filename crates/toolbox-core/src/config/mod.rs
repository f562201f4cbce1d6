//! Logging configuration files
//!
//! Supports user-level (~/.config/toolbox/logging.yaml) and workspace-level
//! (.config/toolbox/logging.yaml) files, in YAML or JSON.

mod error;
mod file;

pub use error::{ConfigError, ConfigResult};
pub use file::{ConfigLevel, LoggingConfigFile, LoggingConfigLoader};
