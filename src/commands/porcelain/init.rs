use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::branch_table::BranchTable;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::commit::Commit;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(RepositoryError::AlreadyInitialized.into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .gitlet/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .gitlet/refs/heads directory")?;

        let initial_oid = self.database().store(&Commit::initial())?;
        let table = BranchTable::new(BranchName::default_branch(), initial_oid.clone());
        self.refs()
            .persist(&table)
            .context("Failed to create initial branch and HEAD")?;

        let staging = self.staging();
        let mut staging = staging.lock().await;
        staging.write_updates()?;

        tracing::info!(path = %self.path().display(), initial = %initial_oid, "initialized repository");

        writeln!(
            self.writer(),
            "Initialized empty Gitlet repository in {}",
            self.metadata_path().display()
        )?;

        Ok(())
    }
}
