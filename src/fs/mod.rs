//! Filesystem module.
//!
//! Provides:
//! - Filename canonicalization
//! - The filesystem collaborator trait
//! - Local-disk and in-memory implementations

pub mod memory;
pub mod naming;
pub mod paths;

pub use memory::MemoryFs;
pub use naming::{
    kebab_case, sanitize_filename, CanonicalFilename, ALLOWED_EXTENSIONS, FALLBACK_EXTENSION,
};
pub use paths::{FileSystem, LocalFs};
