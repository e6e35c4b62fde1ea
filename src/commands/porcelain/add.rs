use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;

impl Repository {
    /// Stage the current content of each path
    ///
    /// A file whose content matches HEAD's version is unstaged instead, which also
    /// cancels a pending removal of it.
    pub async fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        let staging = self.staging();
        let mut staging = staging.lock().await;

        // Load the staging file from the disk
        staging.rehydrate()?;

        let table = self.branch_table()?;
        let head = self.head_commit(&table)?;

        // read every file before touching the staging area
        let blobs = paths
            .iter()
            .map(|raw_path| {
                let path = self.workspace().normalize(raw_path)?;
                let blob = self.workspace().parse_blob(&path)?;
                Ok((path, blob))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        for (path, blob) in blobs {
            let blob_id = blob.object_id()?;

            if head.tree().get(&path) == Some(&blob_id) {
                tracing::debug!(path = %path.display(), "content matches HEAD, unstaging");
                staging.unstage(&path);
            } else {
                self.database().store(&blob)?;
                tracing::debug!(path = %path.display(), oid = %blob_id, "staged for addition");
                staging.stage_add(path, blob_id);
            }
        }

        if staging.is_changed() {
            staging.write_updates()?;
        }

        Ok(())
    }
}
