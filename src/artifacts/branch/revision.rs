//! Commit id resolution
//!
//! `checkout <commit> -- <file>` and `reset` accept full or abbreviated commit ids.
//! An abbreviation resolves only when exactly one stored *commit* starts with it;
//! blobs sharing the prefix are ignored.

use crate::areas::database::Database;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::object_id::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRevision(String);

impl CommitRevision {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let raw = raw.trim();

        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RepositoryError::AmbiguousOrUnknownCommit(raw.to_string()).into());
        }

        Ok(CommitRevision(raw.to_ascii_lowercase()))
    }

    pub fn resolve(&self, database: &Database) -> anyhow::Result<ObjectId> {
        let matches = database.find_commits_by_prefix(&self.0)?;

        match matches.as_slice() {
            [oid] => Ok(oid.clone()),
            [] => Err(RepositoryError::AmbiguousOrUnknownCommit(self.0.clone()).into()),
            candidates => {
                tracing::debug!(
                    prefix = %self.0,
                    candidates = candidates.len(),
                    "abbreviated commit id is ambiguous"
                );
                Err(RepositoryError::AmbiguousOrUnknownCommit(self.0.clone()).into())
            }
        }
    }
}

/// Resolve a full or abbreviated commit id typed on the command line
pub fn resolve_commit_id(database: &Database, raw: &str) -> anyhow::Result<ObjectId> {
    CommitRevision::parse(raw)?.resolve(database)
}
