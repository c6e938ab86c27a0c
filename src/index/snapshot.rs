//! JSON snapshots of the asset index.

use std::io;
use std::path::Path;

use tokio::fs;

use crate::error::{Error, Result};
use crate::index::record::FileRecord;
use crate::index::store::AssetIndex;

/// Write every record in `index` to `path` as pretty JSON.
///
/// The snapshot is written to a staging file beside `path` and renamed over it.
pub async fn save_snapshot(index: &AssetIndex, path: &Path) -> Result<()> {
    let records = index.records();
    let content = serde_json::to_vec_pretty(&records)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    fs::create_dir_all(&parent)
        .await
        .map_err(Error::storage("create directory", &parent))?;

    let staging = parent.join(format!(".snapshot_{}.tmp", uuid::Uuid::new_v4()));
    if let Err(e) = fs::write(&staging, content).await {
        let _ = fs::remove_file(&staging).await;
        return Err(Error::storage("write", &staging)(e));
    }
    if let Err(e) = fs::rename(&staging, path).await {
        let _ = fs::remove_file(&staging).await;
        return Err(Error::storage("replace", path)(e));
    }

    tracing::debug!("Saved {} record(s) to {}", records.len(), path.display());
    Ok(())
}

/// Read the records stored at `path`. A missing snapshot yields no records.
pub async fn load_snapshot(path: &Path) -> Result<Vec<FileRecord>> {
    let content = match fs::read(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::storage("read", path)(e)),
    };

    let records: Vec<FileRecord> = serde_json::from_slice(&content)?;
    tracing::debug!("Loaded {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_snapshot_restores_index() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state").join("index.json");

        let index = AssetIndex::new();
        index.add(vec![
            FileRecord::new("b.png", "team-logos", "logo").with_size(10),
            FileRecord::new("a.png", "team-logos", "logo"),
        ]);
        save_snapshot(&index, &path).await.unwrap();

        let restored = AssetIndex::new();
        restored.replace_all(load_snapshot(&path).await.unwrap());

        assert_eq!(restored.query("logo", "team-logos"), index.query("logo", "team-logos"));
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_empty() {
        let tmp = TempDir::new().unwrap();
        let records = load_snapshot(&tmp.path().join("none.json")).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_json_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.json");
        std::fs::write(&path, b"{not json").unwrap();

        let err = load_snapshot(&path).await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
