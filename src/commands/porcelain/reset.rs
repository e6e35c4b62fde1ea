use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::resolve_commit_id;

impl Repository {
    /// Move the current branch to an arbitrary commit and check out its tree
    pub async fn reset(&mut self, revision: &str) -> anyhow::Result<()> {
        let staging = self.staging();
        let mut staging = staging.lock().await;

        staging.rehydrate()?;

        let mut table = self.branch_table()?;
        let target_id = resolve_commit_id(self.database(), revision)?;

        let head = self.head_commit(&table)?;
        let target = self.database().parse_object_as_commit(&target_id)?;
        self.switch_tree(&mut staging, head.tree(), target.tree())?;

        table.advance_current(target_id.clone());
        self.refs().persist(&table)?;

        tracing::info!(branch = %table.current(), commit = %target_id, "reset branch");

        Ok(())
    }
}
