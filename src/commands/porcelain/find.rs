use crate::areas::repository::Repository;
use crate::artifacts::core::error::RepositoryError;
use std::io::Write;

pub const NO_MATCH_MESSAGE: &str = "Found no commit with that message.";

impl Repository {
    /// Print the id of every commit whose message equals `message` exactly
    pub fn find(&self, message: &str) -> anyhow::Result<()> {
        if !self.is_initialized() {
            return Err(RepositoryError::NotInitialized.into());
        }

        let mut found = 0;
        for oid in self.database().list_commits()? {
            let commit = self.database().parse_object_as_commit(&oid)?;

            if commit.message() == message {
                writeln!(self.writer(), "{}", oid)?;
                found += 1;
            }
        }

        if found == 0 {
            writeln!(self.writer(), "{}", NO_MATCH_MESSAGE)?;
        }

        tracing::debug!(found, "searched commit messages");

        Ok(())
    }
}
