//! Error taxonomy for repository operations
//!
//! Every precondition violation an operation can detect is one of these variants.
//! They are raised through `anyhow` and can be recovered with
//! `error.downcast_ref::<RepositoryError>()`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,

    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("Incorrect operands: {0}")]
    InvalidArguments(String),

    #[error("Object {0} does not exist.")]
    ObjectNotFound(String),

    #[error("A branch with that name does not exist: {0}")]
    BranchNotFound(String),

    #[error("No commit with that id exists: {0}")]
    AmbiguousOrUnknownCommit(String),

    #[error("File does not exist: {0}")]
    FileNotFound(PathBuf),

    #[error("File does not exist in that commit: {0}")]
    FileNotInCommit(PathBuf),

    #[error("Please enter a commit message.")]
    EmptyCommitMessage,

    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("No reason to remove the file: {0}")]
    NothingToRemove(PathBuf),

    #[error("{}", untracked_conflict_message(.0))]
    UntrackedFileConflict(Vec<PathBuf>),

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    SelfMerge,

    #[error("A branch with that name already exists: {0}")]
    BranchExists(String),

    #[error("Cannot remove the current branch.")]
    CannotDeleteCurrent,

    #[error("No need to checkout the current branch.")]
    CheckoutCurrentBranch,

    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("Commit history is corrupt: {0} is its own ancestor")]
    CorruptHistory(String),

    #[error("Object {oid} is corrupt: {reason}")]
    CorruptObject { oid: String, reason: String },
}

fn untracked_conflict_message(paths: &[PathBuf]) -> String {
    let listing = paths
        .iter()
        .map(|path| format!("\t{}", path.display()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "There is an untracked file in the way; delete it, or add and commit it first.\n{}",
        listing
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn untracked_conflict_lists_every_path() {
        let error = RepositoryError::UntrackedFileConflict(vec![
            PathBuf::from("a.txt"),
            PathBuf::from("dir/b.txt"),
        ]);

        assert_eq!(
            error.to_string(),
            "There is an untracked file in the way; delete it, or add and commit it first.\n\ta.txt\n\tdir/b.txt"
        );
    }

    #[test]
    fn taxonomy_survives_anyhow_round_trip() {
        let error: anyhow::Error = RepositoryError::SelfMerge.into();

        assert_eq!(
            error.downcast_ref::<RepositoryError>(),
            Some(&RepositoryError::SelfMerge)
        );
    }
}
