//! Command-line argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// Upload namespace manager CLI.
#[derive(Parser, Debug)]
#[command(
    name = "upload-namespace",
    version,
    about = "Manage folders, filenames and the metadata index of uploaded images",
    long_about = "Manage the folder namespace of an image upload directory.\n\n\
                  Creates and lists folders, canonicalizes and collision-checks filenames, \
                  ingests files and keeps a queryable index of stored assets."
)]
pub struct Args {
    /// Path to configuration file.
    #[arg(short, long, default_value = "uploads.toml", env = "UPLOAD_NAMESPACE_CONFIG")]
    pub config: PathBuf,

    /// Storage root directory.
    #[arg(short, long, env = "UPLOAD_NAMESPACE_ROOT")]
    pub root: Option<PathBuf>,

    /// Index snapshot file.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List known folders.
    Folders,

    /// Create a folder.
    Mkdir {
        /// Folder name; canonicalized to lower-case hyphenated form.
        name: String,
    },

    /// Show the canonical form of a filename and whether it is free.
    Check {
        /// Raw filename.
        filename: String,

        /// Target folder (the root if omitted or unknown).
        #[arg(short, long, default_value = "")]
        folder: String,
    },

    /// Store a local file as an upload and register it.
    Add {
        /// File to ingest. It is copied; the original is left in place.
        path: PathBuf,

        /// Filename to declare instead of the file's own name.
        #[arg(short, long)]
        name: Option<String>,

        /// Target folder (the root if omitted or unknown).
        #[arg(short, long, default_value = "")]
        folder: String,

        /// Category tag (defaults to the configured default category).
        #[arg(long)]
        category: Option<String>,
    },

    /// Register records from a JSON file holding one record or an array of records.
    Register {
        /// JSON file.
        path: PathBuf,
    },

    /// List indexed files in a category and folder.
    Files {
        /// Category tag (defaults to the configured default category).
        #[arg(long)]
        category: Option<String>,

        /// Folder (the root if omitted).
        #[arg(short, long, default_value = "")]
        folder: String,
    },

    /// Rebuild the index from the files on disk.
    Reindex {
        /// Category given to every file found.
        #[arg(long)]
        category: Option<String>,
    },
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(root) = &self.root {
            config.storage.root = Some(root.clone());
        }

        if let Some(snapshot) = &self.snapshot {
            config.index.snapshot_path = Some(snapshot.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let args = Args::parse_from([
            "upload-namespace",
            "--root",
            "/srv/up",
            "add",
            "photo.jpg",
            "--folder",
            "team-logos",
            "--category",
            "logo",
        ]);

        assert_eq!(args.root, Some(PathBuf::from("/srv/up")));
        match args.command {
            Command::Add {
                path,
                name,
                folder,
                category,
            } => {
                assert_eq!(path, PathBuf::from("photo.jpg"));
                assert_eq!(name, None);
                assert_eq!(folder, "team-logos");
                assert_eq!(category.as_deref(), Some("logo"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_merge_into_config() {
        let args = Args::parse_from([
            "upload-namespace",
            "--root",
            "/srv/up",
            "--snapshot",
            "/srv/index.json",
            "folders",
        ]);
        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert_eq!(config.uploads_root(), PathBuf::from("/srv/up"));
        assert_eq!(config.snapshot_path(), PathBuf::from("/srv/index.json"));
    }

    #[test]
    fn test_files_defaults_to_root_folder() {
        let args = Args::parse_from(["upload-namespace", "files"]);
        assert!(matches!(
            args.command,
            Command::Files { ref folder, category: None } if folder.is_empty()
        ));
    }
}
