use crate::areas::workspace::Workspace;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::tree::FileTree;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Working files the old tree does not track but writing the new tree would destroy
///
/// For every path of the new tree this covers an untracked file at the path itself,
/// untracked files inside a directory standing where the file goes, and an untracked
/// file standing where one of its parent directories goes. Returned in path order.
pub fn untracked_overwrites(
    workspace: &Workspace,
    old_tree: &FileTree,
    new_tree: &FileTree,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut conflicts = BTreeSet::new();

    for path in new_tree.paths() {
        if workspace.is_dir(path) {
            conflicts.extend(
                workspace
                    .list_files_in(path)?
                    .into_iter()
                    .filter(|file| !old_tree.contains(file)),
            );
        } else if !old_tree.contains(path) && workspace.exists(path) {
            conflicts.insert(path.clone());
        }

        if let Some(parent) = untracked_parent(workspace, old_tree, path) {
            conflicts.insert(parent.to_path_buf());
        }
    }

    Ok(conflicts.into_iter().collect())
}

fn untracked_parent<'p>(
    workspace: &Workspace,
    old_tree: &FileTree,
    path: &'p Path,
) -> Option<&'p Path> {
    path.parent()?.ancestors().find(|parent| {
        !parent.as_os_str().is_empty() && workspace.exists(parent) && !old_tree.contains(parent)
    })
}

pub fn ensure_no_untracked_overwrites(
    workspace: &Workspace,
    old_tree: &FileTree,
    new_tree: &FileTree,
) -> anyhow::Result<()> {
    let conflicts = untracked_overwrites(workspace, old_tree, new_tree)?;

    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(RepositoryError::UntrackedFileConflict(conflicts).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_id::ObjectId;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn only_files_untracked_by_the_old_tree_conflict() {
        let dir = TempDir::new().unwrap();
        dir.child("tracked.txt").write_str("mine").unwrap();
        dir.child("stray.txt").write_str("mine").unwrap();
        dir.child("irrelevant.txt").write_str("mine").unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        let old_tree = FileTree::from_iter([(PathBuf::from("tracked.txt"), oid('1'))]);
        let new_tree = FileTree::from_iter([
            (PathBuf::from("tracked.txt"), oid('2')),
            (PathBuf::from("stray.txt"), oid('3')),
        ]);

        assert_eq!(
            untracked_overwrites(&workspace, &old_tree, &new_tree).unwrap(),
            vec![PathBuf::from("stray.txt")]
        );
        assert!(ensure_no_untracked_overwrites(&workspace, &new_tree, &new_tree).is_ok());
    }

    #[test]
    fn untracked_files_under_a_directory_in_the_way_conflict() {
        let dir = TempDir::new().unwrap();
        dir.child("a/tracked.txt").write_str("tracked").unwrap();
        dir.child("a/deep/precious.txt").write_str("mine").unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        let old_tree = FileTree::from_iter([(PathBuf::from("a/tracked.txt"), oid('1'))]);
        let new_tree = FileTree::from_iter([(PathBuf::from("a"), oid('2'))]);

        assert_eq!(
            untracked_overwrites(&workspace, &old_tree, &new_tree).unwrap(),
            vec![PathBuf::from("a/deep/precious.txt")]
        );

        dir.child("a/deep/precious.txt").assert("mine");
    }

    #[test]
    fn directory_holding_only_tracked_files_can_be_replaced() {
        let dir = TempDir::new().unwrap();
        dir.child("a/tracked.txt").write_str("tracked").unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        let old_tree = FileTree::from_iter([(PathBuf::from("a/tracked.txt"), oid('1'))]);
        let new_tree = FileTree::from_iter([(PathBuf::from("a"), oid('2'))]);

        assert!(ensure_no_untracked_overwrites(&workspace, &old_tree, &new_tree).is_ok());
    }

    #[test]
    fn untracked_file_standing_where_a_directory_goes_conflicts() {
        let dir = TempDir::new().unwrap();
        dir.child("a").write_str("mine").unwrap();
        dir.child("tracked").write_str("tracked").unwrap();
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        let old_tree = FileTree::from_iter([(PathBuf::from("tracked"), oid('1'))]);
        let new_tree = FileTree::from_iter([
            (PathBuf::from("a/b/c.txt"), oid('2')),
            (PathBuf::from("tracked/inner.txt"), oid('3')),
        ]);

        let err = ensure_no_untracked_overwrites(&workspace, &old_tree, &new_tree).unwrap_err();

        assert_eq!(
            err.downcast_ref::<RepositoryError>(),
            Some(&RepositoryError::UntrackedFileConflict(vec![PathBuf::from("a")]))
        );
    }
}
