use crate::areas::repository::Repository;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::log::LogRecord;
use std::cmp::Reverse;
use std::io::Write;

impl Repository {
    /// Every commit in the object store, newest first
    pub fn global_log(&self) -> anyhow::Result<()> {
        if !self.is_initialized() {
            return Err(RepositoryError::NotInitialized.into());
        }

        let mut commits = self
            .database()
            .list_commits()?
            .into_iter()
            .map(|oid| {
                let commit = self.database().parse_object_as_commit(&oid)?;
                Ok((oid, commit))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        // ids are already sorted, so equal timestamps keep a stable order
        commits.sort_by_key(|(_, commit)| Reverse(commit.timestamp()));

        for (oid, commit) in &commits {
            writeln!(self.writer(), "{}", LogRecord::new(oid, commit))?;
        }

        Ok(())
    }
}
