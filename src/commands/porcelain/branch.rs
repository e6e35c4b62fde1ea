use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;

impl Repository {
    /// Create a branch at the current HEAD commit without switching to it
    pub async fn branch(&mut self, name: &str) -> anyhow::Result<()> {
        let name = BranchName::try_parse(name.to_string())?;

        let mut table = self.branch_table()?;
        let head = table.head().clone();
        table.create_branch(name.clone(), head.clone())?;

        self.refs().persist(&table)?;

        tracing::info!(branch = %name, tip = %head, "created branch");

        Ok(())
    }
}
