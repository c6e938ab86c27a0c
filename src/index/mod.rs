//! Asset metadata index module.
//!
//! Provides:
//! - File records and record input shapes
//! - The in-memory index with category and folder lookups
//! - JSON snapshots
//! - Rescanning records from disk

pub mod record;
pub mod scan;
pub mod snapshot;
pub mod store;

pub use record::{FileRecord, RecordInput};
pub use scan::scan_uploads;
pub use snapshot::{load_snapshot, save_snapshot};
pub use store::AssetIndex;
