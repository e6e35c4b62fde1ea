//! Branch references and HEAD
//!
//! ## File Format
//!
//! - `.gitlet/refs/heads/<name>`: the 40-character id of the branch tip
//! - `.gitlet/HEAD`: `ref: refs/heads/<name>` naming the current branch
//!
//! Reading and writing goes through file locks. Commands work on a
//! [`BranchTable`] snapshot and hand it back to [`Refs::persist`] once every
//! precondition has been checked.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::branch_table::BranchTable;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository metadata directory (typically `.gitlet`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    /// Load every branch tip together with the current branch
    pub fn load_table(&self) -> anyhow::Result<BranchTable> {
        let current = self.read_current_branch()?;

        let mut tips = BTreeMap::new();
        for name in self.list_branches()? {
            let tip = self.read_branch(&name)?;
            tips.insert(name, tip);
        }

        BranchTable::from_parts(current, tips).map_err(|_| {
            anyhow::anyhow!("HEAD names a branch without a ref file under refs/heads")
        })
    }

    /// Write the table back: changed tips, removed branches, and HEAD
    pub fn persist(&self, table: &BranchTable) -> anyhow::Result<()> {
        for name in self.list_branches()? {
            if !table.contains(&name) {
                self.delete_branch_file(&name)?;
            }
        }

        for (name, tip) in table.iter() {
            let branch_path = self.heads_path().join(name.as_ref()).into_boxed_path();
            let unchanged = branch_path.is_file() && &self.read_branch(name)? == tip;

            if !unchanged {
                self.update_ref_file(branch_path, tip.as_ref().to_string())?;
            }
        }

        let head = format!("ref: refs/heads/{}", table.current());
        if self.read_head_content()?.as_deref() != Some(head.as_str()) {
            self.update_ref_file(self.head_path(), head)?;
        }

        Ok(())
    }

    fn read_current_branch(&self) -> anyhow::Result<BranchName> {
        let content = self
            .read_head_content()?
            .ok_or(RepositoryError::NotInitialized)?;

        let symref_match = regex::Regex::new(SYMREF_REGEX)?
            .captures(&content)
            .with_context(|| format!("HEAD is not a branch reference: {}", content))?;

        BranchName::try_parse(symref_match[1].to_string())
    }

    fn read_head_content(&self) -> anyhow::Result<Option<String>> {
        let head_path = self.head_path();
        if !head_path.is_file() {
            return Ok(None);
        }

        Ok(Some(self.read_ref_file(&head_path)?))
    }

    fn read_branch(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        let branch_path = self.heads_path().join(name.as_ref());
        let content = self.read_ref_file(&branch_path)?;

        ObjectId::try_parse(content)
            .with_context(|| format!("branch {} does not hold a commit id", name))
    }

    fn read_ref_file(&self, path: &Path) -> anyhow::Result<String> {
        let mut ref_file = std::fs::OpenOptions::new()
            .read(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Shared, 0, 1)?;

        let mut content = String::new();
        lock.deref_mut()
            .read_to_string(&mut content)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;

        Ok(content.trim().to_string())
    }

    fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.clone())
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        tracing::debug!(path = %path.display(), value = %raw_ref, "updated ref");

        Ok(())
    }

    fn delete_branch_file(&self, name: &BranchName) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name.as_ref());

        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;

        tracing::debug!(branch = %name, "deleted branch ref");

        Ok(())
    }

    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();
        let mut branches = Vec::new();

        for entry in WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
        {
            let relative_path = entry.path().strip_prefix(&heads_path)?;
            branches.push(BranchName::try_parse(
                relative_path.to_string_lossy().to_string(),
            )?);
        }
        branches.sort();

        Ok(branches)
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    fn name(raw: &str) -> BranchName {
        BranchName::try_parse(raw.to_string()).unwrap()
    }

    #[test]
    fn table_survives_persist_and_load() {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        let mut table = BranchTable::new(BranchName::default_branch(), oid('1'));
        table.create_branch(name("feature/login"), oid('2')).unwrap();
        table.set_current(name("feature/login")).unwrap();

        refs.persist(&table).unwrap();

        assert_eq!(refs.load_table().unwrap(), table);
        assert_eq!(
            std::fs::read_to_string(refs.head_path()).unwrap(),
            "ref: refs/heads/feature/login"
        );
    }

    #[test]
    fn deleted_hierarchical_branch_prunes_its_directory() {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        let mut table = BranchTable::new(BranchName::default_branch(), oid('1'));
        table.create_branch(name("feature/login"), oid('2')).unwrap();
        refs.persist(&table).unwrap();

        table.delete_branch(&name("feature/login")).unwrap();
        refs.persist(&table).unwrap();

        assert!(!refs.heads_path().join("feature").exists());
        assert_eq!(refs.list_branches().unwrap(), vec![BranchName::default_branch()]);
    }

    #[test]
    fn missing_head_means_not_initialized() {
        let dir = TempDir::new().unwrap();
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());

        let err = refs.load_table().unwrap_err();

        assert_eq!(
            err.downcast_ref::<RepositoryError>(),
            Some(&RepositoryError::NotInitialized)
        );
    }
}
