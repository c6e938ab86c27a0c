//! Filename collision checking.
//!
//! The check and the later write are separate steps, so two uploads racing for
//! the same canonical name in the same folder can both pass. Uploads are
//! human-initiated and collisions rare; no locking is attempted here.

use std::path::Path;

use crate::error::{Error, Result};
use crate::fs::{sanitize_filename, CanonicalFilename, FileSystem};

/// Sanitize `raw` and make sure nothing already occupies it inside `dir`.
///
/// Fails with [`Error::AlreadyExists`] carrying the canonical name when the
/// target is taken. Any other filesystem failure is propagated unchanged.
pub async fn accept_filename(
    raw: &str,
    dir: &Path,
    fs: &dyn FileSystem,
) -> Result<CanonicalFilename> {
    let filename = sanitize_filename(raw);
    let target = dir.join(filename.as_str());

    if fs.path_exists(&target).await? {
        tracing::warn!("Filename collision: {}", target.display());
        return Err(Error::AlreadyExists(filename.into_string()));
    }

    tracing::debug!("Accepted filename {:?} as {}", raw, filename);
    Ok(filename)
}
