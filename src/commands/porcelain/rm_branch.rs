use crate::areas::repository::Repository;

impl Repository {
    /// Delete a branch pointer; the commits it pointed at stay in the store
    pub async fn rm_branch(&mut self, name: &str) -> anyhow::Result<()> {
        let mut table = self.branch_table()?;
        let (name, _) = table.resolve(name)?;
        let tip = table.delete_branch(&name)?;

        self.refs().persist(&table)?;

        tracing::info!(branch = %name, tip = %tip, "deleted branch");

        Ok(())
    }
}
