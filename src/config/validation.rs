//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Maximum category length.
const MAX_CATEGORY_LENGTH: usize = 64;

static CATEGORY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 _.-]*$").expect("category pattern is a valid regex")
});

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_root(config)?;
    validate_snapshot_path(config)?;
    validate_category(&config.index.default_category)?;

    Ok(())
}

/// The storage root may be missing (it will be created) but must not be a file.
fn validate_root(config: &Config) -> Result<()> {
    let root = config.uploads_root();
    if root.is_file() {
        return Err(Error::ConfigValidation {
            field: "storage.root".to_string(),
            message: format!("'{}' is a file, not a directory", root.display()),
        });
    }

    Ok(())
}

fn validate_snapshot_path(config: &Config) -> Result<()> {
    let Some(path) = &config.index.snapshot_path else {
        return Ok(());
    };

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if !is_json {
        return Err(Error::ConfigValidation {
            field: "index.snapshot_path".to_string(),
            message: format!("'{}' must be a .json file", path.display()),
        });
    }

    Ok(())
}

/// Validate a category tag used as a default.
pub fn validate_category(category: &str) -> Result<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(Error::MissingConfig("index.default_category".to_string()));
    }

    if category.len() > MAX_CATEGORY_LENGTH {
        return Err(Error::ConfigValidation {
            field: "index.default_category".to_string(),
            message: format!(
                "Category '{}' is too long (maximum {} characters)",
                category, MAX_CATEGORY_LENGTH
            ),
        });
    }

    if !CATEGORY_PATTERN.is_match(category) {
        return Err(Error::ConfigValidation {
            field: "index.default_category".to_string(),
            message: format!(
                "Category '{}' contains invalid characters. Only letters, digits, spaces, dots, hyphens, and underscores allowed.",
                category
            ),
        });
    }

    Ok(())
}
