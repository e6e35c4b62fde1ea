use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

pub const METADATA_DIR: &str = ".gitlet";

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Turn a path typed on the command line into a repository-relative path
    ///
    /// `./a/b.txt`, `a//b.txt` and `<root>/a/b.txt` all normalize to `a/b.txt`.
    pub fn normalize(&self, raw_path: &str) -> anyhow::Result<PathBuf> {
        // tree entries are line based
        if raw_path.chars().any(char::is_control) {
            return Err(RepositoryError::InvalidArguments(format!(
                "{:?} contains control characters",
                raw_path
            ))
            .into());
        }

        let raw = Path::new(raw_path);
        let raw = if raw.is_absolute() {
            raw.strip_prefix(self.path.as_ref())
                .map_err(|_| RepositoryError::InvalidArguments(format!("{} is outside the repository", raw_path)))?
        } else {
            raw
        };

        let mut normalized = PathBuf::new();
        for component in raw.components() {
            match component {
                Component::Normal(name) => normalized.push(name),
                Component::CurDir => {}
                _ => {
                    return Err(RepositoryError::InvalidArguments(format!(
                        "{} is not a path inside the repository",
                        raw_path
                    ))
                    .into());
                }
            }
        }

        if normalized.as_os_str().is_empty() || Self::is_ignored(&normalized) {
            return Err(RepositoryError::InvalidArguments(format!(
                "{} is not a trackable file",
                raw_path
            ))
            .into());
        }

        Ok(normalized)
    }

    /// Every regular file below the root, relative and sorted, skipping `.gitlet`
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        self.list_files_in(Path::new(""))
    }

    /// Regular files below `dir_path`, relative to the root and sorted
    pub fn list_files_in(&self, dir_path: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = WalkDir::new(self.path.join(dir_path))
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != METADATA_DIR)
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(PathBuf::from)
            })
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            matches!(component, Component::Normal(name) if name == METADATA_DIR)
        })
    }

    pub fn exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn is_dir(&self, dir_path: &Path) -> bool {
        self.path.join(dir_path).is_dir()
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);

        let content = std::fs::read(&full_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(Bytes::from(content))
    }

    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Blob> {
        if !self.exists(file_path) {
            return Err(RepositoryError::FileNotFound(file_path.to_path_buf()).into());
        }

        Ok(Blob::new(self.read_file(file_path)?))
    }

    /// Overwrite (or create) a file, creating missing parent directories
    pub fn write_file(&self, file_path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if path.is_dir() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove existing directory: {:?}", file_path))?;
        }

        if let Some(parent) = path.parent() {
            self.make_parent_dirs(parent)?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    /// Delete a file if present, then prune directories left empty
    pub fn delete_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        self.prune_empty_parent_dirs(&path)
    }

    fn make_parent_dirs(&self, dir_path: &Path) -> anyhow::Result<()> {
        // a file standing where a directory is needed gets replaced
        let mut current = self.path.to_path_buf();
        let relative = dir_path.strip_prefix(self.path.as_ref()).unwrap_or(dir_path);

        for component in relative.components() {
            current.push(component);
            if current.is_file() {
                std::fs::remove_file(&current)
                    .with_context(|| format!("Failed to remove file: {:?}", current))?;
            }
        }

        std::fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {:?}", dir_path))
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.starts_with(self.path.as_ref())
            && parent.is_dir()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory: {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    // Deletions run before writes so a path that changes from file to directory
    // (or back) is cleared first.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for (file_path, _) in migration.actions_of(ActionType::Delete) {
            self.delete_file(file_path)?;
        }

        for action in [ActionType::Modify, ActionType::Add] {
            for (file_path, oid) in migration.actions_of(action) {
                let oid = oid
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("Invalid action and entry combination"))?;
                let data = migration.load_blob_data(oid)?;

                self.write_file(file_path, &data)?;
            }
        }

        Ok(())
    }
}
