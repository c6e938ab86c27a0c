//! Filesystem collaborator and the local-disk implementation.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use crate::error::{Error, Result};

/// Filesystem operations the namespace depends on.
///
/// Every failure other than "not found" on an existence check surfaces as
/// [`Error::Storage`].
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Create a directory and its parents. Succeeds if it already exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()>;

    /// Check whether anything exists at `path`.
    async fn path_exists(&self, path: &Path) -> Result<bool>;

    /// Names of the immediate subdirectories of `path`.
    async fn list_dirs(&self, path: &Path) -> Result<Vec<String>>;

    /// Names of the regular files directly inside `path`.
    async fn list_files(&self, path: &Path) -> Result<Vec<String>>;

    /// Move a file to `to`, which must not be observable half-written.
    async fn move_file(&self, from: &Path, to: &Path) -> Result<()>;
}

/// [`FileSystem`] backed by the local disk through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }

    async fn list_entries(&self, path: &Path, want_dirs: bool) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::storage("read directory", path)(e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(Error::storage("read directory", path))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(Error::storage("inspect", &entry.path()))?;

            let matches = if want_dirs {
                file_type.is_dir()
            } else {
                file_type.is_file()
            };
            if !matches {
                continue;
            }

            // Non UTF-8 names can never be canonical; skip them
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl FileSystem for LocalFs {
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .await
            .map_err(Error::storage("create directory", path))
    }

    async fn path_exists(&self, path: &Path) -> Result<bool> {
        // Any entry counts, including a dangling symlink
        match fs::symlink_metadata(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::storage("check existence of", path)(e)),
        }
    }

    async fn list_dirs(&self, path: &Path) -> Result<Vec<String>> {
        self.list_entries(path, true).await
    }

    async fn list_files(&self, path: &Path) -> Result<Vec<String>> {
        self.list_entries(path, false).await
    }

    async fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        match fs::rename(from, to).await {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::storage("move", from)(e));
            }
            Err(e) => {
                tracing::debug!(
                    "Rename of {} failed ({}), falling back to copy",
                    from.display(),
                    e.kind()
                );
            }
        }

        // Copy into a staging file next to the target, then rename into place
        let parent = to.parent().ok_or_else(|| {
            Error::storage("move", to)(io::Error::new(
                io::ErrorKind::InvalidInput,
                "target has no parent directory",
            ))
        })?;
        let staging = parent.join(format!(".upload_{}.part", uuid::Uuid::new_v4()));

        if let Err(e) = fs::copy(from, &staging).await {
            let _ = fs::remove_file(&staging).await;
            return Err(Error::storage("copy", from)(e));
        }

        if let Err(e) = fs::rename(&staging, to).await {
            let _ = fs::remove_file(&staging).await;
            return Err(Error::storage("move", to)(e));
        }

        fs::remove_file(from)
            .await
            .map_err(Error::storage("remove", from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("team-logos");
        let fs = LocalFs::new();

        assert_ok!(fs.ensure_dir(&dir).await);
        assert_ok!(fs.ensure_dir(&dir).await);
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_path_exists() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.png");
        let fs = LocalFs::new();

        assert!(!fs.path_exists(&file).await.unwrap());
        std::fs::write(&file, b"png").unwrap();
        assert!(fs.path_exists(&file).await.unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_path_exists_counts_dangling_symlink() {
        let tmp = TempDir::new().unwrap();
        let link = tmp.path().join("taken.png");
        std::os::unix::fs::symlink(tmp.path().join("missing-target"), &link).unwrap();

        assert!(LocalFs::new().path_exists(&link).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_dirs_and_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("b-dir")).unwrap();
        std::fs::create_dir(tmp.path().join("a-dir")).unwrap();
        std::fs::write(tmp.path().join("z.png"), b"z").unwrap();
        std::fs::write(tmp.path().join("y.jpg"), b"y").unwrap();
        let fs = LocalFs::new();

        assert_eq!(fs.list_dirs(tmp.path()).await.unwrap(), vec!["a-dir", "b-dir"]);
        assert_eq!(fs.list_files(tmp.path()).await.unwrap(), vec!["y.jpg", "z.png"]);
        assert!(fs
            .list_files(&tmp.path().join("missing"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_move_file() {
        let tmp = TempDir::new().unwrap();
        let from = tmp.path().join("incoming.tmp");
        let to = tmp.path().join("photo.png");
        std::fs::write(&from, b"data").unwrap();

        LocalFs::new().move_file(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_move_missing_file_is_storage_error() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFs::new()
            .move_file(&tmp.path().join("gone.tmp"), &tmp.path().join("x.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Storage { op: "move", .. }));
    }
}
