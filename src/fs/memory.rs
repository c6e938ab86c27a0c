//! In-memory filesystem for tests and embedding.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::fs::paths::FileSystem;

#[derive(Debug, Default)]
struct Tree {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
    failing: BTreeSet<PathBuf>,
}

/// A [`FileSystem`] held entirely in memory.
///
/// Paths registered with [`MemoryFs::fail_on`] make every operation touching
/// them fail with a permission error.
#[derive(Debug, Default)]
pub struct MemoryFs {
    tree: Mutex<Tree>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn tree(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a file (and its parent directories).
    pub fn insert_file(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        let path = path.into();
        let mut tree = self.tree();
        if let Some(parent) = path.parent() {
            add_dir_chain(&mut tree.dirs, parent);
        }
        tree.files.insert(path, contents.into());
    }

    /// Add a directory (and its parents).
    pub fn insert_dir(&self, path: impl AsRef<Path>) {
        add_dir_chain(&mut self.tree().dirs, path.as_ref());
    }

    /// Make every operation on `path` fail.
    pub fn fail_on(&self, path: impl Into<PathBuf>) {
        self.tree().failing.insert(path.into());
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.tree().dirs.contains(path)
    }

    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        self.tree().files.get(path).cloned()
    }

    fn check(tree: &Tree, op: &'static str, path: &Path) -> Result<()> {
        if tree.failing.contains(path) {
            return Err(Error::storage(op, path)(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "injected failure",
            )));
        }
        Ok(())
    }
}

fn add_dir_chain(dirs: &mut BTreeSet<PathBuf>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        dirs.insert(ancestor.to_path_buf());
    }
}

fn child_names<'a>(
    paths: impl Iterator<Item = &'a PathBuf>,
    parent: &Path,
) -> Vec<String> {
    paths
        .filter(|p| p.parent() == Some(parent))
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .collect()
}

#[async_trait]
impl FileSystem for MemoryFs {
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        let mut tree = self.tree();
        Self::check(&tree, "create directory", path)?;
        add_dir_chain(&mut tree.dirs, path);
        Ok(())
    }

    async fn path_exists(&self, path: &Path) -> Result<bool> {
        let tree = self.tree();
        Self::check(&tree, "check existence of", path)?;
        Ok(tree.dirs.contains(path) || tree.files.contains_key(path))
    }

    async fn list_dirs(&self, path: &Path) -> Result<Vec<String>> {
        let tree = self.tree();
        Self::check(&tree, "read directory", path)?;
        Ok(child_names(tree.dirs.iter(), path))
    }

    async fn list_files(&self, path: &Path) -> Result<Vec<String>> {
        let tree = self.tree();
        Self::check(&tree, "read directory", path)?;
        Ok(child_names(tree.files.keys(), path))
    }

    async fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        let mut tree = self.tree();
        Self::check(&tree, "move", from)?;
        Self::check(&tree, "move", to)?;

        let contents = tree.files.remove(from).ok_or_else(|| {
            Error::storage("move", from)(io::Error::new(io::ErrorKind::NotFound, "no such file"))
        })?;
        tree.files.insert(to.to_path_buf(), contents);
        Ok(())
    }
}
