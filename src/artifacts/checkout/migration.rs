//! Checkout migration
//!
//! Moving the working tree from an old file tree to a new one involves:
//!
//! 1. Refusing when an untracked working file would be overwritten
//! 2. Deleting files tracked only by the old tree
//! 3. Writing every file of the new tree, overwriting what is there
//!
//! The plan is computed up front so a conflict leaves the working directory and the
//! staging area untouched. The caller clears the staging area after applying.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::conflict::ensure_no_untracked_overwrites;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::FileTree;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::PathBuf;

/// Type of file system action required for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Create new file
    Add,
    /// Delete file
    Delete,
    /// Overwrite a file both trees track
    Modify,
}

/// Set of planned actions grouped by type
pub type ActionsSet = HashMap<ActionType, Vec<(PathBuf, Option<ObjectId>)>>;

pub struct Migration<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
    old_tree: &'r FileTree,
    new_tree: &'r FileTree,
    actions: ActionsSet,
}

impl<'r> Migration<'r> {
    pub fn new(
        database: &'r Database,
        workspace: &'r Workspace,
        old_tree: &'r FileTree,
        new_tree: &'r FileTree,
    ) -> Self {
        let actions = HashMap::from([
            (ActionType::Add, Vec::new()),
            (ActionType::Delete, Vec::new()),
            (ActionType::Modify, Vec::new()),
        ]);

        Self {
            database,
            workspace,
            old_tree,
            new_tree,
            actions,
        }
    }

    pub fn actions_of(&self, action: ActionType) -> impl Iterator<Item = &(PathBuf, Option<ObjectId>)> {
        self.actions.get(&action).into_iter().flatten()
    }

    pub fn load_blob_data(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        Ok(self.database.parse_object_as_blob(oid)?.into_content())
    }

    /// Plan and apply the migration
    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        self.plan_changes()?;
        let workspace = self.workspace;
        workspace.apply_migration(self)?;

        tracing::debug!(
            added = self.actions[&ActionType::Add].len(),
            modified = self.actions[&ActionType::Modify].len(),
            deleted = self.actions[&ActionType::Delete].len(),
            "applied checkout migration"
        );

        Ok(())
    }

    pub fn plan_changes(&mut self) -> anyhow::Result<()> {
        ensure_no_untracked_overwrites(self.workspace, self.old_tree, self.new_tree)?;

        for path in self.old_tree.paths() {
            if !self.new_tree.contains(path) {
                self.record(ActionType::Delete, path.clone(), None);
            }
        }

        for (path, oid) in self.new_tree.iter() {
            let action = if self.old_tree.contains(path) {
                ActionType::Modify
            } else {
                ActionType::Add
            };
            self.record(action, path.clone(), Some(oid.clone()));
        }

        Ok(())
    }

    fn record(&mut self, action: ActionType, path: PathBuf, oid: Option<ObjectId>) {
        self.actions.entry(action).or_default().push((path, oid));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::core::error::RepositoryError;
    use crate::artifacts::objects::blob::Blob;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    struct Fixture {
        dir: TempDir,
        database: Database,
        workspace: Workspace,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let database = Database::new(dir.path().join(".gitlet/objects").into_boxed_path());
            let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

            Fixture {
                dir,
                database,
                workspace,
            }
        }

        fn blob(&self, content: &'static str) -> ObjectId {
            self.database
                .store(&Blob::new(Bytes::from_static(content.as_bytes())))
                .unwrap()
        }
    }

    #[test]
    fn old_only_files_are_deleted_and_new_files_written() {
        let fixture = Fixture::new();
        fixture.dir.child("keep.txt").write_str("old").unwrap();
        fixture.dir.child("dir/drop.txt").write_str("drop").unwrap();

        let old_tree = FileTree::from_iter([
            (PathBuf::from("keep.txt"), fixture.blob("old")),
            (PathBuf::from("dir/drop.txt"), fixture.blob("drop")),
        ]);
        let new_tree = FileTree::from_iter([
            (PathBuf::from("keep.txt"), fixture.blob("new")),
            (PathBuf::from("nested/add.txt"), fixture.blob("add")),
        ]);

        Migration::new(&fixture.database, &fixture.workspace, &old_tree, &new_tree)
            .apply_changes()
            .unwrap();

        assert_eq!(
            fixture.workspace.list_files().unwrap(),
            vec![PathBuf::from("keep.txt"), PathBuf::from("nested/add.txt")]
        );
        assert_eq!(
            fixture.workspace.read_file(Path::new("keep.txt")).unwrap(),
            Bytes::from_static(b"new")
        );
        assert!(!fixture.dir.path().join("dir").exists());
    }

    #[test]
    fn untracked_file_in_the_way_aborts_before_any_change() {
        let fixture = Fixture::new();
        fixture.dir.child("tracked.txt").write_str("tracked").unwrap();
        fixture.dir.child("stray.txt").write_str("precious").unwrap();

        let old_tree = FileTree::from_iter([(PathBuf::from("tracked.txt"), fixture.blob("tracked"))]);
        let new_tree = FileTree::from_iter([(PathBuf::from("stray.txt"), fixture.blob("theirs"))]);

        let err = Migration::new(&fixture.database, &fixture.workspace, &old_tree, &new_tree)
            .apply_changes()
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<RepositoryError>(),
            Some(&RepositoryError::UntrackedFileConflict(vec![PathBuf::from("stray.txt")]))
        );
        assert!(fixture.dir.path().join("tracked.txt").exists());
        assert_eq!(
            fixture.workspace.read_file(Path::new("stray.txt")).unwrap(),
            Bytes::from_static(b"precious")
        );
    }
}
