use crate::areas::repository::Repository;
use crate::artifacts::core::error::RepositoryError;

impl Repository {
    /// Unstage a pending addition and, when HEAD tracks the file, delete it and
    /// stage its removal
    pub async fn rm(&mut self, raw_path: &str) -> anyhow::Result<()> {
        let staging = self.staging();
        let mut staging = staging.lock().await;

        staging.rehydrate()?;

        let table = self.branch_table()?;
        let head = self.head_commit(&table)?;
        let path = self.workspace().normalize(raw_path)?;

        let staged = staging.staged_addition(&path).is_some();
        let tracked = head.tree().contains(&path);

        if !staged && !tracked {
            return Err(RepositoryError::NothingToRemove(path).into());
        }

        if staged {
            staging.unstage_add(&path);
        }

        if tracked {
            self.workspace().delete_file(&path)?;
            staging.stage_remove(path.clone());
        }

        tracing::debug!(path = %path.display(), staged, tracked, "removed file");

        staging.write_updates()?;

        Ok(())
    }
}
