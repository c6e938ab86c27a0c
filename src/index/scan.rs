//! Rebuilding records from what is on disk.

use std::path::{Path, PathBuf};

use futures::future::try_join_all;

use crate::error::Result;
use crate::fs::FileSystem;
use crate::index::record::FileRecord;
use crate::namespace::FolderName;

/// Check whether a filename looks like an image by its extension.
fn is_image_file(filename: &str) -> bool {
    if filename.starts_with('.') {
        return false;
    }
    mime_guess::from_path(filename)
        .first()
        .map(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .unwrap_or(false)
}

/// Build records for every image file in the root and the given folders.
///
/// Files in the root get an empty folder. All records get `category`.
pub async fn scan_uploads(
    fs: &dyn FileSystem,
    root: &Path,
    folders: &[FolderName],
    category: &str,
) -> Result<Vec<FileRecord>> {
    let mut locations: Vec<(String, PathBuf)> = vec![(String::new(), root.to_path_buf())];
    locations.extend(
        folders
            .iter()
            .map(|folder| (folder.to_string(), root.join(folder.as_str()))),
    );

    let listings = try_join_all(locations.iter().map(|(_, dir)| fs.list_files(dir))).await?;

    let mut records = Vec::new();
    for ((folder, _), files) in locations.iter().zip(listings) {
        records.extend(
            files
                .into_iter()
                .filter(|name| is_image_file(name))
                .map(|name| FileRecord::new(name, folder.clone(), category)),
        );
    }

    tracing::debug!("Scanned {} image file(s) under {}", records.len(), root.display());
    Ok(records)
}
