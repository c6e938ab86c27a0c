//! Folder name validation and the set of known folders.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::fs::{kebab_case, FileSystem};

/// Lowercase alphanumerics and hyphens, at least two characters, no hyphen at either end.
static FOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9-]*[a-z0-9]$").expect("folder pattern is a valid regex")
});

/// A validated folder name. Only constructed by [`validate_folder_name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FolderName(String);

impl FolderName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FolderName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate and canonicalize a raw folder name.
///
/// Surrounding whitespace is trimmed. A name that already matches the folder
/// pattern is returned unchanged, hyphen runs included. Otherwise interior
/// separator runs become single hyphens, so `"  Team Logos "` yields
/// `team-logos`. Input that starts or ends with anything other than an ASCII
/// letter or digit is rejected rather than repaired: `"-bad-"` yields `None`.
pub fn validate_folder_name(raw: &str) -> Option<FolderName> {
    let trimmed = raw.trim();
    if FOLDER_PATTERN.is_match(trimmed) {
        return Some(FolderName(trimmed.to_string()));
    }

    let edges_ok = match (trimmed.chars().next(), trimmed.chars().last()) {
        (Some(first), Some(last)) => first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric(),
        _ => false,
    };
    if !edges_ok {
        return None;
    }

    let candidate = kebab_case(trimmed);
    if FOLDER_PATTERN.is_match(&candidate) {
        Some(FolderName(candidate))
    } else {
        None
    }
}

/// The known folders under a storage root.
///
/// The set only grows, and is always kept in lexicographic order.
#[derive(Debug)]
pub struct FolderNamespace {
    root: PathBuf,
    known: RwLock<BTreeSet<FolderName>>,
}

impl FolderNamespace {
    /// Create an empty namespace rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            known: RwLock::new(BTreeSet::new()),
        }
    }

    /// Create a namespace seeded with the root's existing, validly named subdirectories.
    pub async fn discover(root: impl Into<PathBuf>, fs: &dyn FileSystem) -> Result<Self> {
        let namespace = Self::new(root);

        let mut found = BTreeSet::new();
        for dir in fs.list_dirs(&namespace.root).await? {
            match validate_folder_name(&dir) {
                Some(name) if name.as_str() == dir => {
                    found.insert(name);
                }
                _ => tracing::debug!("Ignoring non-canonical directory: {}", dir),
            }
        }

        tracing::debug!("Discovered {} folder(s) under {}", found.len(), namespace.root.display());
        *namespace.known.write().await = found;
        Ok(namespace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a folder and return the updated set.
    ///
    /// An invalid name is ignored and the current set is returned unchanged.
    /// Creating an existing folder is not an error.
    pub async fn create(&self, raw: &str, fs: &dyn FileSystem) -> Result<Vec<FolderName>> {
        let Some(name) = validate_folder_name(raw) else {
            tracing::debug!("Ignoring invalid folder name: {:?}", raw);
            return Ok(self.list().await);
        };

        // Hold the write lock across directory creation so creations never interleave
        let mut known = self.known.write().await;
        fs.ensure_dir(&self.root.join(name.as_str())).await?;

        if known.insert(name.clone()) {
            tracing::info!("Created folder: {}", name);
        }

        Ok(known.iter().cloned().collect())
    }

    /// Snapshot of the known folders, sorted.
    pub async fn list(&self) -> Vec<FolderName> {
        self.known.read().await.iter().cloned().collect()
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.known.read().await.iter().any(|known| known.as_str() == name)
    }

    /// Storage location for a folder, falling back to the root for unknown names.
    ///
    /// The fallback is silent; it does not reject unknown folders.
    pub async fn resolve(&self, name: &str) -> PathBuf {
        if !name.is_empty() && self.contains(name).await {
            self.root.join(name)
        } else {
            self.root.clone()
        }
    }
}
