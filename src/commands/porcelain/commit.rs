use crate::areas::repository::Repository;
use crate::areas::staging::StagingArea;
use crate::artifacts::branch::branch_table::BranchTable;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::FileTree;
use std::io::Write;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        if message.trim().is_empty() {
            return Err(RepositoryError::EmptyCommitMessage.into());
        }

        let staging = self.staging();
        let mut staging = staging.lock().await;

        // Load the staging file from the disk
        staging.rehydrate()?;

        if staging.is_empty() {
            return Err(RepositoryError::NothingToCommit.into());
        }

        let mut table = self.branch_table()?;
        let head_oid = table.head().clone();
        let tree = self.head_commit(&table)?.tree().clone();

        let commit_id = self.write_commit(
            &mut staging,
            &mut table,
            vec![head_oid],
            tree,
            message.to_string(),
        )?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            table.current(),
            commit_id.to_short_oid(),
            message.lines().next().unwrap_or_default()
        )?;

        Ok(())
    }

    /// Fold the staging area into `tree`, store the commit and advance the current branch
    ///
    /// Clears and persists the staging area once the branch has moved.
    pub(crate) fn write_commit(
        &self,
        staging: &mut StagingArea,
        table: &mut BranchTable,
        parents: Vec<ObjectId>,
        mut tree: FileTree,
        message: String,
    ) -> anyhow::Result<ObjectId> {
        tree.fold(staging.additions(), staging.removals());

        let commit = Commit::new(parents, self.settings().commit_timestamp(), tree, message);
        let commit_id = self.database().store(&commit)?;

        table.advance_current(commit_id.clone());
        self.refs().persist(table)?;

        staging.clear();
        staging.write_updates()?;

        tracing::info!(
            branch = %table.current(),
            commit = %commit_id,
            files = commit.tree().len(),
            merge = commit.is_merge(),
            "created commit"
        );

        Ok(commit_id)
    }
}
