use crate::areas::repository::Repository;
use crate::areas::staging::StagingArea;
use crate::artifacts::branch::revision::resolve_commit_id;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::FileTree;
use std::io::Write;

impl Repository {
    /// Make `name` the current branch and its tip's tree the working tree
    pub async fn checkout_branch(&mut self, name: &str) -> anyhow::Result<()> {
        let staging = self.staging();
        let mut staging = staging.lock().await;

        staging.rehydrate()?;

        let mut table = self.branch_table()?;
        let (name, tip) = table.resolve(name)?;

        if table.is_current(&name) {
            return Err(RepositoryError::CheckoutCurrentBranch.into());
        }

        let head = self.head_commit(&table)?;
        let target = self.database().parse_object_as_commit(&tip)?;
        self.switch_tree(&mut staging, head.tree(), target.tree())?;

        table.set_current(name.clone())?;
        self.refs().persist(&table)?;

        tracing::info!(branch = %name, tip = %tip, "switched branch");

        writeln!(self.writer(), "Switched to branch '{}'", name)?;

        Ok(())
    }

    /// Restore one file from HEAD; the staging area is left alone
    pub async fn checkout_file(&mut self, raw_path: &str) -> anyhow::Result<()> {
        let table = self.branch_table()?;
        let head = table.head().clone();

        self.restore_file(&head, raw_path)
    }

    /// Restore one file from a commit named by a full or abbreviated id
    pub async fn checkout_file_from_commit(
        &mut self,
        revision: &str,
        raw_path: &str,
    ) -> anyhow::Result<()> {
        if !self.is_initialized() {
            return Err(RepositoryError::NotInitialized.into());
        }

        let commit_id = resolve_commit_id(self.database(), revision)?;

        self.restore_file(&commit_id, raw_path)
    }

    fn restore_file(&self, commit_id: &ObjectId, raw_path: &str) -> anyhow::Result<()> {
        let path = self.workspace().normalize(raw_path)?;
        let commit = self.database().parse_object_as_commit(commit_id)?;

        let blob_id = commit
            .tree()
            .get(&path)
            .ok_or_else(|| RepositoryError::FileNotInCommit(path.clone()))?;

        let blob = self.database().parse_object_as_blob(blob_id)?;
        self.workspace().write_file(&path, blob.content())?;

        tracing::debug!(path = %path.display(), commit = %commit_id, "restored file");

        Ok(())
    }

    /// Replace the working tree `old_tree` with `new_tree` and clear the staging area
    ///
    /// Refuses before writing anything when an untracked file would be overwritten.
    pub(crate) fn switch_tree(
        &self,
        staging: &mut StagingArea,
        old_tree: &FileTree,
        new_tree: &FileTree,
    ) -> anyhow::Result<()> {
        let mut migration = Migration::new(self.database(), self.workspace(), old_tree, new_tree);
        migration.apply_changes()?;

        staging.clear();
        staging.write_updates()
    }
}
