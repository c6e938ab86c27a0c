//! The upload namespace: folders, filename acceptance and the metadata index.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::{Error, Result};
use crate::fs::{CanonicalFilename, FileSystem};
use crate::index::{scan_uploads, AssetIndex, FileRecord, RecordInput};
use crate::namespace::collision::accept_filename;
use crate::namespace::folders::{validate_folder_name, FolderName, FolderNamespace};

/// An upload part handed over by the receiving layer after its own size and
/// MIME checks.
#[derive(Debug, Clone)]
pub struct UploadPart {
    /// Filename as declared by the client.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// Declared MIME type, if any.
    pub mime_type: Option<String>,
    /// Where the received bytes currently live.
    pub temp_path: PathBuf,
}

/// One namespace per storage root, constructed at startup and shared by handle.
#[derive(Debug)]
pub struct UploadNamespace<F: FileSystem> {
    fs: F,
    folders: FolderNamespace,
    index: AssetIndex,
}

impl<F: FileSystem> UploadNamespace<F> {
    /// Create a namespace with no known folders and an empty index.
    pub fn new(root: impl Into<PathBuf>, fs: F) -> Self {
        Self {
            fs,
            folders: FolderNamespace::new(root),
            index: AssetIndex::new(),
        }
    }

    /// Open a namespace over an already provisioned root, adopting its
    /// existing folders.
    pub async fn open(root: impl Into<PathBuf>, fs: F) -> Result<Self> {
        let folders = FolderNamespace::discover(root, &fs).await?;
        Ok(Self {
            fs,
            folders,
            index: AssetIndex::new(),
        })
    }

    pub fn root(&self) -> &Path {
        self.folders.root()
    }

    pub fn index(&self) -> &AssetIndex {
        &self.index
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// Validate a folder name without creating anything.
    pub fn validate_folder(&self, raw: &str) -> Option<FolderName> {
        validate_folder_name(raw)
    }

    /// Create a folder; invalid names leave the set unchanged.
    pub async fn create_folder(&self, raw: &str) -> Result<Vec<FolderName>> {
        self.folders.create(raw, &self.fs).await
    }

    pub async fn list_folders(&self) -> Vec<FolderName> {
        self.folders.list().await
    }

    /// Storage location for `name`; unknown names resolve to the root.
    pub async fn resolve_folder(&self, name: &str) -> PathBuf {
        self.folders.resolve(name).await
    }

    /// Canonicalize `raw` and check it is free in `folder`.
    pub async fn accept_upload(&self, raw: &str, folder: &str) -> Result<CanonicalFilename> {
        let dir = self.resolve_folder(folder).await;
        accept_filename(raw, &dir, &self.fs).await
    }

    /// Accept an upload part, move it into place and register its record.
    ///
    /// Names whose canonical stem is empty are rejected with
    /// [`Error::InvalidName`]. Unknown folders fall back to the root, and the
    /// record is registered under the folder actually used.
    pub async fn store_upload(
        &self,
        part: UploadPart,
        folder: &str,
        category: &str,
    ) -> Result<FileRecord> {
        let folder = if self.folders.contains(folder).await {
            folder
        } else {
            ""
        };
        let dir = self.resolve_folder(folder).await;

        let filename = accept_filename(&part.filename, &dir, &self.fs).await?;
        if filename.has_empty_stem() {
            return Err(Error::InvalidName(part.filename));
        }

        let target = dir.join(filename.as_str());
        self.fs.move_file(&part.temp_path, &target).await?;

        tracing::info!(
            "Stored {} ({} bytes, {})",
            target.display(),
            part.size,
            part.mime_type.as_deref().unwrap_or("unknown type")
        );

        let record = FileRecord::new(filename.into_string(), folder, category)
            .with_size(part.size)
            .with_uploaded_at(Utc::now());
        self.index.add(record.clone());
        Ok(record)
    }

    /// Append one or more records to the index.
    pub fn register_file(&self, input: impl Into<RecordInput>) {
        self.index.add(input);
    }

    /// Register loosely typed input; anything that is not a record or a list of
    /// records is ignored. Returns how many records were registered.
    pub fn register_json(&self, value: serde_json::Value) -> usize {
        match RecordInput::from_json(value) {
            Some(input) => {
                let records = input.into_records();
                let count = records.len();
                self.index.add(records);
                count
            }
            None => 0,
        }
    }

    /// Replace the whole index; an empty input is ignored.
    pub fn reindex_files(&self, records: Vec<FileRecord>) {
        self.index.replace_all(records);
    }

    /// Records in (category, folder), sorted by filename.
    pub fn list_files(&self, category: &str, folder: &str) -> Vec<FileRecord> {
        self.index.query(category, folder)
    }

    /// Rebuild the index from the image files on disk, tagging them with
    /// `category`. Returns how many files were found.
    pub async fn rescan(&self, category: &str) -> Result<usize> {
        let folders = self.list_folders().await;
        let records = scan_uploads(&self.fs, self.root(), &folders, category).await?;
        let count = records.len();
        self.reindex_files(records);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use serde_json::json;
    use tokio_test::assert_ok;

    async fn namespace_with_logos() -> UploadNamespace<MemoryFs> {
        let namespace = UploadNamespace::new("/up", MemoryFs::new());
        namespace.create_folder("Team Logos").await.unwrap();
        namespace
    }

    fn part(filename: &str, temp: &str) -> UploadPart {
        UploadPart {
            filename: filename.to_string(),
            size: 3,
            mime_type: Some("image/png".to_string()),
            temp_path: PathBuf::from(temp),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_folders() {
        let namespace = namespace_with_logos().await;
        namespace.create_folder("team-logos").await.unwrap();
        namespace.create_folder("-bad-").await.unwrap();
        let set = namespace.create_folder("banners").await.unwrap();

        let names: Vec<_> = set.iter().map(FolderName::as_str).collect();
        assert_eq!(names, vec!["banners", "team-logos"]);
        assert_eq!(namespace.list_folders().await, set);
    }

    #[tokio::test]
    async fn test_accept_upload_collision() {
        let namespace = namespace_with_logos().await;
        namespace
            .filesystem()
            .insert_file("/up/team-logos/a.png", b"a".to_vec());

        let err = namespace.accept_upload("a.png", "team-logos").await.unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(ref name) if name == "a.png"));

        let name = assert_ok!(namespace.accept_upload("b.png", "team-logos").await);
        assert_eq!(name.as_str(), "b.png");
    }

    #[tokio::test]
    async fn test_accept_upload_unknown_folder_checks_root() {
        let namespace = namespace_with_logos().await;
        namespace.filesystem().insert_file("/up/a.png", b"a".to_vec());

        let err = namespace.accept_upload("a.png", "nowhere").await.unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_store_upload_moves_and_registers() {
        let namespace = namespace_with_logos().await;
        namespace
            .filesystem()
            .insert_file("/tmp/part-1", b"png".to_vec());

        let record = namespace
            .store_upload(part("Our Logo.PNG", "/tmp/part-1"), "team-logos", "logo")
            .await
            .unwrap();

        assert_eq!(record.filename, "our-logo.png");
        assert_eq!(record.folder, "team-logos");
        assert_eq!(record.size, 3);
        assert!(record.uploaded_at.is_some());
        assert_eq!(
            namespace.filesystem().read(Path::new("/up/team-logos/our-logo.png")),
            Some(b"png".to_vec())
        );
        assert_eq!(namespace.list_files("logo", "team-logos"), vec![record]);
    }

    #[tokio::test]
    async fn test_store_upload_rejects_empty_stem_and_collisions() {
        let namespace = namespace_with_logos().await;
        let fs = namespace.filesystem();
        fs.insert_file("/tmp/p1", b"1".to_vec());
        fs.insert_file("/tmp/p2", b"2".to_vec());
        fs.insert_file("/up/taken.png", b"t".to_vec());

        let err = namespace
            .store_upload(part("!!!.png", "/tmp/p1"), "", "misc")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidName(_)));

        let err = namespace
            .store_upload(part("Taken.png", "/tmp/p2"), "unknown-folder", "misc")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));

        assert!(namespace.index().is_empty());
        assert!(fs.read(Path::new("/tmp/p1")).is_some());
    }

    #[tokio::test]
    async fn test_store_upload_unknown_folder_registers_root() {
        let namespace = namespace_with_logos().await;
        namespace.filesystem().insert_file("/tmp/p", b"x".to_vec());

        let record = namespace
            .store_upload(part("x.gif", "/tmp/p"), "nowhere", "misc")
            .await
            .unwrap();

        assert_eq!(record.folder, "");
        assert_eq!(namespace.list_files("misc", "").len(), 1);
    }

    #[tokio::test]
    async fn test_register_reindex_and_list() {
        let namespace = namespace_with_logos().await;
        namespace.reindex_files(vec![
            FileRecord::new("b.png", "team-logos", "logo"),
            FileRecord::new("a.png", "team-logos", "logo"),
        ]);
        namespace.register_file(FileRecord::new("c.png", "team-logos", "logo"));
        namespace.reindex_files(Vec::new());

        let files: Vec<_> = namespace
            .list_files("logo", "team-logos")
            .into_iter()
            .map(|r| r.filename)
            .collect();
        assert_eq!(files, vec!["a.png", "b.png", "c.png"]);
    }

    #[tokio::test]
    async fn test_register_json() {
        let namespace = namespace_with_logos().await;

        assert_eq!(
            namespace.register_json(json!({ "filename": "a.png", "category": "logo" })),
            1
        );
        assert_eq!(namespace.register_json(json!(["not", "records"])), 0);
        assert_eq!(namespace.register_json(json!(null)), 0);
        assert_eq!(namespace.index().len(), 1);
    }

    #[tokio::test]
    async fn test_open_and_rescan() {
        let fs = MemoryFs::new();
        fs.insert_file("/up/team-logos/a.png", b"a".to_vec());
        fs.insert_file("/up/team-logos/notes.txt", b"n".to_vec());
        fs.insert_file("/up/banner.jpg", b"b".to_vec());

        let namespace = UploadNamespace::open("/up", fs).await.unwrap();
        assert_eq!(namespace.rescan("general").await.unwrap(), 2);

        assert_eq!(namespace.list_files("general", "team-logos").len(), 1);
        assert_eq!(namespace.list_files("general", "").len(), 1);
    }

    #[tokio::test]
    async fn test_rescan_of_empty_disk_keeps_index() {
        let namespace = UploadNamespace::new("/up", MemoryFs::new());
        namespace.register_file(FileRecord::new("a.png", "", "logo"));

        assert_eq!(namespace.rescan("general").await.unwrap(), 0);
        assert_eq!(namespace.index().len(), 1);
    }

    #[tokio::test]
    async fn test_local_disk_round_trip() {
        use crate::fs::LocalFs;
        use tempfile::TempDir;

        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("uploads");
        std::fs::create_dir_all(root.join("team-logos")).unwrap();
        std::fs::create_dir_all(root.join("Not Canonical")).unwrap();

        let namespace = UploadNamespace::open(&root, LocalFs::new()).await.unwrap();
        let names: Vec<_> = namespace
            .list_folders()
            .await
            .into_iter()
            .map(|f| f.to_string())
            .collect();
        assert_eq!(names, vec!["team-logos"]);

        let incoming = tmp.path().join("incoming.bin");
        std::fs::write(&incoming, b"fake png").unwrap();
        let upload = UploadPart {
            filename: "A.PNG".to_string(),
            size: 8,
            mime_type: None,
            temp_path: incoming.clone(),
        };
        let record = namespace
            .store_upload(upload, "team-logos", "logo")
            .await
            .unwrap();

        assert_eq!(record.relative_path(), "team-logos/a.png");
        assert!(root.join("team-logos/a.png").is_file());
        assert!(!incoming.exists());

        let err = namespace.accept_upload("a.png", "team-logos").await.unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(ref name) if name == "a.png"));
    }
}
