//! Upload namespace manager - CLI entry point.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use upload_namespace::{
    cli::{Args, Command},
    config::{validate_category, validate_config, Config},
    error::{exit_codes, Error, Result},
    fs::{FileSystem, LocalFs},
    index::{load_snapshot, save_snapshot},
    namespace::{FolderName, UploadNamespace, UploadPart},
    output::{
        create_spinner, folder_label, print_error, print_files, print_folders, print_info,
        print_rejection, print_success, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            if e.is_rejection() {
                print_rejection(&e);
            } else {
                print_error(&format!("{}", e));
            }
            let code = match e {
                ref e if e.is_rejection() => exit_codes::NAME_REJECTED,
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
                Error::Storage { .. } | Error::Io(_) => exit_codes::STORAGE_ERROR,
                _ => exit_codes::UNEXPECTED_ERROR,
            };
            ExitCode::from(code as u8)
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Load configuration
    let mut config = match Config::load_if_present(&args.config)? {
        Some(config) => config,
        None => {
            print_warning(&format!(
                "Configuration file not found: {}",
                args.config.display()
            ));
            print_info("Using default configuration with CLI arguments");
            Config::default()
        }
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;

    // Provision the storage root, then open the namespace over it
    let root = config.uploads_root();
    let fs = LocalFs::new();
    fs.ensure_dir(&root).await?;

    let namespace = UploadNamespace::open(&root, fs).await?;
    let snapshot_path = config.snapshot_path();
    namespace.reindex_files(load_snapshot(&snapshot_path).await?);

    let default_category = config.index.default_category.trim().to_string();

    match args.command {
        Command::Folders => {
            print_folders(&namespace.list_folders().await);
        }
        Command::Mkdir { name } => {
            let folders = make_folder(&namespace, &name).await?;
            print_folders(&folders);
        }
        Command::Check { filename, folder } => {
            warn_on_fallback(&namespace, &folder).await;
            let accepted = namespace.accept_upload(&filename, &folder).await?;
            print_success(&format!(
                "'{}' is available as {} in {}",
                filename,
                accepted,
                folder_label(&folder)
            ));
        }
        Command::Add {
            path,
            name,
            folder,
            category,
        } => {
            warn_on_fallback(&namespace, &folder).await;
            let category = category.unwrap_or(default_category);
            validate_category(&category)?;
            let record = add_local_file(&namespace, &path, name, &folder, &category).await?;
            save_snapshot(namespace.index(), &snapshot_path).await?;
            print_success(&format!(
                "Stored {} ({})",
                record.relative_path(),
                record.category
            ));
        }
        Command::Register { path } => {
            let content = tokio::fs::read(&path)
                .await
                .map_err(Error::storage("read", &path))?;
            let value: serde_json::Value = serde_json::from_slice(&content)?;

            let count = namespace.register_json(value);
            if count == 0 {
                print_warning("No records found in input; index unchanged");
            } else {
                save_snapshot(namespace.index(), &snapshot_path).await?;
                print_success(&format!("Registered {} record(s)", count));
            }
        }
        Command::Files { category, folder } => {
            let category = category.unwrap_or(default_category);
            let records = namespace.list_files(&category, &folder);
            print_files(&category, &folder, &records);

            if records.is_empty() && !namespace.index().is_empty() {
                print_info(&format!(
                    "Indexed categories: {}",
                    namespace.index().categories().join(", ")
                ));
                let folders: Vec<String> = namespace
                    .index()
                    .folders()
                    .iter()
                    .map(|f| folder_label(f).to_string())
                    .collect();
                print_info(&format!("Indexed folders: {}", folders.join(", ")));
            }
        }
        Command::Reindex { category } => {
            let category = category.unwrap_or(default_category);
            let spinner = create_spinner(&format!("Scanning {}...", root.display()));
            let result = namespace.rescan(&category).await;
            spinner.finish_and_clear();

            let count = result?;
            if count == 0 {
                print_warning("No image files found; index left unchanged");
            } else {
                save_snapshot(namespace.index(), &snapshot_path).await?;
                print_success(&format!("Indexed {} file(s) as '{}'", count, category));
            }
        }
    }

    Ok(())
}

/// Create a folder, warning instead of failing when the name is invalid.
async fn make_folder<F: FileSystem>(
    namespace: &UploadNamespace<F>,
    name: &str,
) -> Result<Vec<FolderName>> {
    match namespace.validate_folder(name) {
        Some(folder) => {
            let folders = namespace.create_folder(name).await?;
            print_success(&format!("Folder ready: {}", folder));
            Ok(folders)
        }
        None => {
            print_warning(&format!(
                "'{}' is not a valid folder name; folders unchanged",
                name
            ));
            namespace.create_folder(name).await
        }
    }
}

/// Tell the user when a folder argument will silently resolve to the root.
async fn warn_on_fallback(namespace: &UploadNamespace<LocalFs>, folder: &str) {
    if !folder.is_empty() && namespace.resolve_folder(folder).await == namespace.root() {
        print_warning(&format!("Unknown folder '{}'; using the root", folder));
    }
}

/// Copy a local file into a staging area and store it as an upload.
async fn add_local_file(
    namespace: &UploadNamespace<LocalFs>,
    path: &Path,
    name: Option<String>,
    folder: &str,
    category: &str,
) -> Result<upload_namespace::index::FileRecord> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(Error::storage("read", path))?;

    let declared = match name {
        Some(name) => name,
        None => path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidName(path.display().to_string()))?,
    };

    let staging = namespace
        .root()
        .join(format!(".upload_{}.part", uuid::Uuid::new_v4()));
    tokio::fs::copy(path, &staging)
        .await
        .map_err(Error::storage("copy", path))?;

    let part = UploadPart {
        filename: declared,
        size: metadata.len(),
        mime_type: mime_guess::from_path(path).first().map(|m| m.to_string()),
        temp_path: staging.clone(),
    };
    print_info(&format!("Storing {}", path.display()));

    let result = namespace.store_upload(part, folder, category).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(&staging).await;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use upload_namespace::fs::MemoryFs;

    fn names(set: &[FolderName]) -> Vec<&str> {
        set.iter().map(FolderName::as_str).collect()
    }

    #[tokio::test]
    async fn test_make_folder_invalid_name_leaves_set_unchanged() {
        let namespace = UploadNamespace::new("/up", MemoryFs::new());
        make_folder(&namespace, "banners").await.unwrap();

        let set = make_folder(&namespace, "bad!").await.unwrap();

        assert_eq!(names(&set), vec!["banners"]);
        assert!(!namespace.filesystem().is_dir(std::path::Path::new("/up/bad")));
    }

    #[tokio::test]
    async fn test_make_folder_creates_valid_name() {
        let namespace = UploadNamespace::new("/up", MemoryFs::new());

        let set = make_folder(&namespace, "  Team Logos ").await.unwrap();

        assert_eq!(names(&set), vec!["team-logos"]);
        assert!(namespace
            .filesystem()
            .is_dir(std::path::Path::new("/up/team-logos")));
    }
}
