use crate::areas::repository::Repository;
use crate::artifacts::checkout::conflict::ensure_no_untracked_overwrites;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::merge::MergeOutcome;
use crate::artifacts::merge::merge_plan::{FileAction, MergePlan, conflict_marker};
use crate::artifacts::merge::split_point::SplitPointFinder;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::io::Write;

pub const ANCESTOR_MESSAGE: &str = "Given branch is an ancestor of the current branch.";
pub const FAST_FORWARD_MESSAGE: &str = "Current branch fast-forwarded.";
pub const CONFLICT_MESSAGE: &str = "Encountered a merge conflict.";

impl Repository {
    /// Three-way merge of branch `name` into the current branch
    ///
    /// Preconditions are checked in this order, before anything is written:
    /// unknown branch, non-empty staging area, merging a branch with itself, untracked
    /// files in the way. When every path merges cleanly a commit with two parents is
    /// created; otherwise the conflicting files are written with markers, everything is
    /// staged and no commit is made.
    pub async fn merge(&mut self, name: &str) -> anyhow::Result<MergeOutcome> {
        let staging = self.staging();
        let mut staging = staging.lock().await;

        staging.rehydrate()?;

        let mut table = self.branch_table()?;
        let (target_name, target_id) = table.resolve(name)?;

        if !staging.is_empty() {
            return Err(RepositoryError::UncommittedChanges.into());
        }

        if table.is_current(&target_name) {
            return Err(RepositoryError::SelfMerge.into());
        }

        let head_id = table.head().clone();
        let finder = SplitPointFinder::new(|oid: &ObjectId| self.database().load_slim_commit(oid));

        let head_ancestors = finder.ancestor_set(&head_id)?;

        if head_ancestors.contains(&target_id) {
            writeln!(self.writer(), "{}", ANCESTOR_MESSAGE)?;
            return Ok(MergeOutcome::UpToDate);
        }

        let split_id = finder.split_point_within(&head_ancestors, &target_id)?;

        let head = self.database().parse_object_as_commit(&head_id)?;
        let target = self.database().parse_object_as_commit(&target_id)?;

        if split_id.as_ref() == Some(&head_id) {
            self.switch_tree(&mut staging, head.tree(), target.tree())?;

            table.advance_current(target_id.clone());
            self.refs().persist(&table)?;

            tracing::info!(branch = %table.current(), tip = %target_id, "fast-forwarded");
            writeln!(self.writer(), "{}", FAST_FORWARD_MESSAGE)?;

            return Ok(MergeOutcome::FastForwarded);
        }

        ensure_no_untracked_overwrites(self.workspace(), head.tree(), target.tree())?;

        let split = split_id
            .as_ref()
            .map(|oid| self.database().parse_object_as_commit(oid))
            .transpose()?;
        let plan = MergePlan::build(split.as_ref().map(|c| c.tree()), head.tree(), target.tree());

        for (path, action) in plan.actions() {
            match action {
                FileAction::TakeTarget(blob_id) => {
                    let blob = self.database().parse_object_as_blob(blob_id)?;
                    self.workspace().write_file(path, blob.content())?;
                    staging.stage_add(path.clone(), blob_id.clone());
                }
                FileAction::Remove => {
                    self.workspace().delete_file(path)?;
                    staging.stage_remove(path.clone());
                }
                FileAction::KeepAbsent => {}
                FileAction::Conflict {
                    head: head_blob,
                    target: target_blob,
                } => {
                    let ours = self.load_side(head_blob.as_ref())?;
                    let theirs = self.load_side(target_blob.as_ref())?;

                    let content = conflict_marker(ours.as_deref(), theirs.as_deref());
                    self.workspace().write_file(path, &content)?;

                    let blob_id = self.database().store(&Blob::new(content))?;
                    staging.stage_add(path.clone(), blob_id);

                    tracing::debug!(path = %path.display(), "conflict");
                }
            }
        }

        if plan.has_conflicts() {
            staging.write_updates()?;
            writeln!(self.writer(), "{}", CONFLICT_MESSAGE)?;

            return Ok(MergeOutcome::Conflicted);
        }

        let message = format!("Merged {} into {}.", target_name, table.current());
        let merge_id = self.write_commit(
            &mut staging,
            &mut table,
            vec![head_id, target_id],
            head.tree().clone(),
            message,
        )?;

        Ok(MergeOutcome::Merged(merge_id))
    }

    fn load_side(&self, blob_id: Option<&ObjectId>) -> anyhow::Result<Option<Bytes>> {
        blob_id
            .map(|oid| Ok(self.database().parse_object_as_blob(oid)?.into_content()))
            .transpose()
    }
}
