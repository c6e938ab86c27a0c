//! Configuration module for the upload namespace.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{Config, IndexConfig, StorageConfig, DEFAULT_SNAPSHOT_NAME};
pub use validation::{validate_category, validate_config};
