//! Folder and file listings.

use console::style;

use crate::index::FileRecord;
use crate::namespace::FolderName;

/// Display label for a folder, with the root shown explicitly.
pub fn folder_label(folder: &str) -> &str {
    if folder.is_empty() {
        "(root)"
    } else {
        folder
    }
}

/// Format a byte count for display.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Print the known folders.
pub fn print_folders(folders: &[FolderName]) {
    println!();
    println!("{}", style(format!("Folders ({}):", folders.len())).bold());
    for folder in folders {
        println!("  {}", folder);
    }
    println!();
}

/// Print the records of one (category, folder) pair.
pub fn print_files(category: &str, folder: &str, records: &[FileRecord]) {
    println!();
    println!(
        "{}",
        style(format!(
            "Files in {} / {} ({}):",
            category,
            folder_label(folder),
            records.len()
        ))
        .bold()
    );
    for record in records {
        let uploaded = record
            .uploaded_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<40} {:>10}  {}",
            record.filename,
            format_size(record.size),
            style(uploaded).dim()
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_label() {
        assert_eq!(folder_label(""), "(root)");
        assert_eq!(folder_label("team-logos"), "team-logos");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
