//! In-memory asset metadata index.

use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::index::record::{FileRecord, RecordInput};

/// Record storage plus secondary indices over `category` and `folder`.
///
/// Index values are positions into `records`.
#[derive(Debug, Default)]
struct IndexData {
    records: Vec<FileRecord>,
    by_category: HashMap<String, Vec<usize>>,
    by_folder: HashMap<String, Vec<usize>>,
}

impl IndexData {
    fn build(records: Vec<FileRecord>) -> Self {
        let mut data = Self::default();
        data.extend(records);
        data
    }

    fn extend(&mut self, records: impl IntoIterator<Item = FileRecord>) {
        for record in records {
            let position = self.records.len();
            self.by_category
                .entry(record.category.clone())
                .or_default()
                .push(position);
            self.by_folder
                .entry(record.folder.clone())
                .or_default()
                .push(position);
            self.records.push(record);
        }
    }
}

/// Queryable collection of [`FileRecord`]s, the only writer of record state.
///
/// Readers never observe a partially replaced index: [`AssetIndex::replace_all`]
/// builds the new data before swapping it in under the write lock.
#[derive(Debug, Default)]
pub struct AssetIndex {
    data: RwLock<IndexData>,
}

impl AssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace every record with `records` and rebuild the indices.
    ///
    /// An empty input leaves the current contents untouched.
    pub fn replace_all(&self, records: Vec<FileRecord>) {
        if records.is_empty() {
            tracing::debug!("Ignoring empty reindex; keeping {} record(s)", self.len());
            return;
        }

        let count = records.len();
        let rebuilt = IndexData::build(records);
        *self.write() = rebuilt;
        tracing::info!("Reindexed {} record(s)", count);
    }

    /// Append one or more records without touching existing ones.
    pub fn add(&self, input: impl Into<RecordInput>) {
        let records = input.into().into_records();
        if records.is_empty() {
            return;
        }

        let count = records.len();
        self.write().extend(records);
        tracing::debug!("Registered {} record(s)", count);
    }

    /// Records whose category and folder both match exactly, sorted by filename.
    pub fn query(&self, category: &str, folder: &str) -> Vec<FileRecord> {
        let data = self.read();

        let (Some(in_category), Some(in_folder)) =
            (data.by_category.get(category), data.by_folder.get(folder))
        else {
            return Vec::new();
        };

        // Walk the shorter posting list and check the other field directly
        let candidates = if in_category.len() <= in_folder.len() {
            in_category
        } else {
            in_folder
        };

        let mut matches: Vec<FileRecord> = candidates
            .iter()
            .map(|&position| &data.records[position])
            .filter(|record| record.category == category && record.folder == folder)
            .cloned()
            .collect();

        matches.sort_by(|a, b| a.filename.cmp(&b.filename));
        matches
    }

    /// Every record, sorted by folder, category, then filename.
    pub fn records(&self) -> Vec<FileRecord> {
        let mut records = self.read().records.clone();
        records.sort_by(|a, b| {
            (&a.folder, &a.category, &a.filename).cmp(&(&b.folder, &b.category, &b.filename))
        });
        records
    }

    /// Distinct categories present, sorted.
    pub fn categories(&self) -> Vec<String> {
        let data = self.read();
        let keys: BTreeSet<&String> = data.by_category.keys().collect();
        keys.into_iter().cloned().collect()
    }

    /// Distinct folders present, sorted. The root appears as an empty string.
    pub fn folders(&self) -> Vec<String> {
        let data = self.read();
        let keys: BTreeSet<&String> = data.by_folder.keys().collect();
        keys.into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
