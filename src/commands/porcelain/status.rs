use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::StatusInfo;
use std::io::Write;

impl Repository {
    pub async fn status(&self) -> anyhow::Result<()> {
        let staging = self.staging();
        let mut staging = staging.lock().await;

        // Load the staging file from the disk
        staging.rehydrate()?;

        let table = self.branch_table()?;
        let head = self.head_commit(&table)?;

        let status = StatusInfo::collect(&table, &staging, head.tree(), self.workspace())?;
        write!(self.writer(), "{}", status)?;

        Ok(())
    }
}
