//! Console output utilities.

use console::style;

use crate::error::Error;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print a rejected folder or file name together with what the user can do about it.
pub fn print_rejection(error: &Error) {
    match error {
        Error::AlreadyExists(name) => eprintln!(
            "{} '{}' already exists there; rename the file or pick another folder",
            style("TAKEN").yellow().bold(),
            name
        ),
        Error::InvalidName(name) => eprintln!(
            "{} '{}' has no valid canonical form (folders: lower-case letters, digits and inner hyphens)",
            style("INVALID").yellow().bold(),
            name
        ),
        other => print_error(&other.to_string()),
    }
}
