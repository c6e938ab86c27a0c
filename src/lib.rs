//! Upload Namespace - folder and filename management for uploaded image assets
//!
//! This library manages the namespace of an image upload directory.
//!
//! # Features
//!
//! - Folder name validation and creation
//! - Filename canonicalization and collision checking
//! - An in-memory metadata index queried by category and folder
//! - JSON snapshots and disk rescans of the index
//!
//! # Example
//!
//! ```no_run
//! use upload_namespace::{FileRecord, LocalFs, UploadNamespace};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let namespace = UploadNamespace::open("uploads", LocalFs::new()).await?;
//!
//!     namespace.create_folder("Team Logos").await?;
//!     let filename = namespace.accept_upload("Our Logo.PNG", "team-logos").await?;
//!     namespace.register_file(FileRecord::new(filename.as_str(), "team-logos", "logo"));
//!
//!     for record in namespace.list_files("logo", "team-logos") {
//!         println!("{}", record.relative_path());
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod index;
pub mod namespace;
pub mod output;

// Re-exports for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use fs::{sanitize_filename, CanonicalFilename, FileSystem, LocalFs, MemoryFs};
pub use index::{AssetIndex, FileRecord, RecordInput};
pub use namespace::{validate_folder_name, FolderName, UploadNamespace, UploadPart};
