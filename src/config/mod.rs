//! Configuration module for gopro-archiver.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - CLI argument and environment merging
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{AccountConfig, ApiConfig, Config, OptionsConfig};
pub use modes::{Action, ProgressMode};
pub use validation::validate_config;
