//! Upload namespace module.
//!
//! Provides:
//! - Folder name validation and the known-folder set
//! - Filename collision checking
//! - The namespace object tying folders, filenames and the index together

pub mod collision;
pub mod folders;
pub mod manager;

pub use collision::accept_filename;
pub use folders::{validate_folder_name, FolderName, FolderNamespace};
pub use manager::{UploadNamespace, UploadPart};
