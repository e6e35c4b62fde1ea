use crate::areas::staging::StagingArea;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::branch_table::BranchTable;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::FileTree;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use colored::Colorize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

pub type ChangeSet = BTreeMap<PathBuf, WorkspaceChangeType>;
pub type FileSet = BTreeSet<PathBuf>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) branches: Vec<(BranchName, bool)>,
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

impl StatusInfo {
    pub fn collect(
        table: &BranchTable,
        staging: &StagingArea,
        head_tree: &FileTree,
        workspace: &Workspace,
    ) -> anyhow::Result<Self> {
        let branches = table
            .iter()
            .map(|(name, _)| (name.clone(), table.is_current(name)))
            .collect();

        let staged_files = staging.additions().map(|(path, _)| path.clone()).collect();
        let removed_files = staging.removals().cloned().collect();

        let mut workspace_changeset = ChangeSet::new();
        for (path, oid) in staging.additions() {
            if let Some(change) = Self::compare_with_workspace(workspace, path, oid)? {
                workspace_changeset.insert(path.clone(), change);
            }
        }
        for (path, oid) in head_tree.iter() {
            if staging.staged_addition(path).is_some() || staging.is_staged_for_removal(path) {
                continue;
            }
            if let Some(change) = Self::compare_with_workspace(workspace, path, oid)? {
                workspace_changeset.insert(path.clone(), change);
            }
        }

        let untracked_files = workspace
            .list_files()?
            .into_iter()
            .filter(|path| {
                staging.staged_addition(path).is_none()
                    && (!head_tree.contains(path) || staging.is_staged_for_removal(path))
            })
            .collect();

        Ok(StatusInfo {
            branches,
            staged_files,
            removed_files,
            workspace_changeset,
            untracked_files,
        })
    }

    fn compare_with_workspace(
        workspace: &Workspace,
        path: &Path,
        expected: &ObjectId,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        if !workspace.exists(path) {
            return Ok(Some(WorkspaceChangeType::Deleted));
        }

        let actual = Blob::new(workspace.read_file(path)?).object_id()?;
        if &actual != expected {
            Ok(Some(WorkspaceChangeType::Modified))
        } else {
            Ok(None)
        }
    }

    pub fn staged_files(&self) -> &FileSet {
        &self.staged_files
    }

    pub fn removed_files(&self) -> &FileSet {
        &self.removed_files
    }

    pub fn workspace_changeset(&self) -> &ChangeSet {
        &self.workspace_changeset
    }

    pub fn untracked_files(&self) -> &FileSet {
        &self.untracked_files
    }
}

impl fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for (name, is_current) in &self.branches {
            if *is_current {
                writeln!(f, "{}", format!("*{}", name).green())?;
            } else {
                writeln!(f, "{}", name)?;
            }
        }
        writeln!(f)?;

        writeln!(f, "=== Staged Files ===")?;
        for path in &self.staged_files {
            writeln!(f, "{}", path.display().to_string().green())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Removed Files ===")?;
        for path in &self.removed_files {
            writeln!(f, "{}", path.display().to_string().red())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Modifications Not Staged For Commit ===")?;
        for (path, change) in &self.workspace_changeset {
            writeln!(f, "{}", format!("{} {}", path.display(), change).red())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Untracked Files ===")?;
        for path in &self.untracked_files {
            writeln!(f, "{}", path.display().to_string().red())?;
        }
        writeln!(f)
    }
}
