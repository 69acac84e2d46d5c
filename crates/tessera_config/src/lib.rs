//! Parsing and validation of `tessera.toml` flow configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`FlowConfig`] describing the target device, the router's iteration
//! budget, and the placement annealing schedule.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
