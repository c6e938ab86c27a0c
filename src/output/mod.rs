//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Folder and file listings
//! - Progress spinner

pub mod console;
pub mod listing;
pub mod progress;

pub use self::console::{
    print_error, print_info, print_rejection, print_success, print_warning,
};
pub use listing::{folder_label, format_size, print_files, print_folders};
pub use progress::create_spinner;
