//! File records and the shapes they arrive in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one stored asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Canonical filename.
    pub filename: String,

    /// Folder name, or empty for the storage root.
    #[serde(default)]
    pub folder: String,

    /// Free-form classification tag.
    pub category: String,

    /// Size in bytes, when known.
    #[serde(default)]
    pub size: u64,

    /// When the upload was accepted, when known.
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl FileRecord {
    pub fn new(
        filename: impl Into<String>,
        folder: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            folder: folder.into(),
            category: category.into(),
            size: 0,
            uploaded_at: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_uploaded_at(mut self, uploaded_at: DateTime<Utc>) -> Self {
        self.uploaded_at = Some(uploaded_at);
        self
    }

    /// Path of the file relative to the storage root.
    pub fn relative_path(&self) -> String {
        if self.folder.is_empty() {
            self.filename.clone()
        } else {
            format!("{}/{}", self.folder, self.filename)
        }
    }
}

/// Either a single record or a batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordInput {
    One(FileRecord),
    Many(Vec<FileRecord>),
}

impl RecordInput {
    /// Interpret loosely typed input as records.
    ///
    /// Returns `None` for anything that is neither a record object nor an
    /// array of records; callers treat that as nothing to register.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match serde_json::from_value(value) {
            Ok(input) => Some(input),
            Err(e) => {
                tracing::debug!("Ignoring malformed record input: {}", e);
                None
            }
        }
    }

    pub fn into_records(self) -> Vec<FileRecord> {
        match self {
            RecordInput::One(record) => vec![record],
            RecordInput::Many(records) => records,
        }
    }
}

impl From<FileRecord> for RecordInput {
    fn from(record: FileRecord) -> Self {
        RecordInput::One(record)
    }
}

impl From<Vec<FileRecord>> for RecordInput {
    fn from(records: Vec<FileRecord>) -> Self {
        RecordInput::Many(records)
    }
}
