//! Per-file three-way merge classification
//!
//! Every path tracked by the split, HEAD or target tree is classified from its blob
//! ids `s`, `h` and `g` in those trees (absent when untracked):
//!
//! | split has it | condition                 | action        |
//! |--------------|---------------------------|---------------|
//! | yes          | `h == s`, target lacks it | `Remove`      |
//! | yes          | `g == s`, HEAD lacks it   | `KeepAbsent`  |
//! | yes          | `g != s`, `h == s`        | `TakeTarget`  |
//! | yes          | `h`, `g`, `s` all differ  | `Conflict`    |
//! | no           | only target has it        | `TakeTarget`  |
//! | no           | both have it, `h != g`    | `Conflict`    |
//!
//! Anything else keeps HEAD's version and needs no action.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::FileTree;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub const CONFLICT_START: &str = "<<<<<<< HEAD\n";
pub const CONFLICT_SEPARATOR: &str = "=======\n";
pub const CONFLICT_END: &str = ">>>>>>>\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    /// Restore the target's blob and stage it
    TakeTarget(ObjectId),
    /// Delete the working file and stage the removal
    Remove,
    /// HEAD deleted a file the target left unchanged; it stays deleted
    KeepAbsent,
    /// Both sides changed the file in different ways
    Conflict {
        head: Option<ObjectId>,
        target: Option<ObjectId>,
    },
}

pub fn classify(
    split: Option<&ObjectId>,
    head: Option<&ObjectId>,
    target: Option<&ObjectId>,
) -> Option<FileAction> {
    let conflict = || FileAction::Conflict {
        head: head.cloned(),
        target: target.cloned(),
    };

    match split {
        Some(s) => {
            if head == Some(s) && target.is_none() {
                Some(FileAction::Remove)
            } else if target == Some(s) && head.is_none() {
                Some(FileAction::KeepAbsent)
            } else if head == Some(s) && target != Some(s) {
                target.cloned().map(FileAction::TakeTarget)
            } else if head != Some(s) && target != Some(s) && head != target {
                Some(conflict())
            } else {
                None
            }
        }
        None => match (head, target) {
            (None, Some(g)) => Some(FileAction::TakeTarget(g.clone())),
            (Some(h), Some(g)) if h != g => Some(conflict()),
            _ => None,
        },
    }
}

/// Classified actions for every path of a merge, in path order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    actions: BTreeMap<PathBuf, FileAction>,
}

impl MergePlan {
    /// Classify every path of the three trees; a missing split commit counts as an empty tree
    pub fn build(split: Option<&FileTree>, head: &FileTree, target: &FileTree) -> Self {
        let empty = FileTree::new();
        let split = split.unwrap_or(&empty);

        let paths = split
            .paths()
            .chain(head.paths())
            .chain(target.paths())
            .cloned()
            .collect::<BTreeSet<_>>();

        let actions = paths
            .into_iter()
            .filter_map(|path| {
                classify(split.get(&path), head.get(&path), target.get(&path))
                    .map(|action| (path, action))
            })
            .collect();

        MergePlan { actions }
    }

    pub fn actions(&self) -> impl Iterator<Item = (&PathBuf, &FileAction)> {
        self.actions.iter()
    }

    pub fn has_conflicts(&self) -> bool {
        self.actions
            .values()
            .any(|action| matches!(action, FileAction::Conflict { .. }))
    }
}

/// Working-file content recording both sides of a conflict
pub fn conflict_marker(head: Option<&[u8]>, target: Option<&[u8]>) -> Bytes {
    let mut content = Vec::new();

    content.extend_from_slice(CONFLICT_START.as_bytes());
    content.extend_from_slice(head.unwrap_or_default());
    content.extend_from_slice(CONFLICT_SEPARATOR.as_bytes());
    content.extend_from_slice(target.unwrap_or_default());
    content.extend_from_slice(CONFLICT_END.as_bytes());

    Bytes::from(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    fn option_oid(c: Option<char>) -> Option<ObjectId> {
        c.map(oid)
    }

    #[rstest]
    #[case::unchanged_in_head_deleted_in_target(Some('s'), Some('s'), None, Some(FileAction::Remove))]
    #[case::deleted_in_head_unchanged_in_target(Some('s'), None, Some('s'), Some(FileAction::KeepAbsent))]
    #[case::changed_only_in_target(Some('s'), Some('s'), Some('g'), Some(FileAction::TakeTarget(oid('g'))))]
    #[case::changed_only_in_head(Some('s'), Some('h'), Some('s'), None)]
    #[case::changed_identically(Some('s'), Some('a'), Some('a'), None)]
    #[case::deleted_on_both_sides(Some('s'), None, None, None)]
    #[case::changed_differently(Some('s'), Some('h'), Some('g'), Some(FileAction::Conflict { head: Some(oid('h')), target: Some(oid('g')) }))]
    #[case::changed_in_head_deleted_in_target(Some('s'), Some('h'), None, Some(FileAction::Conflict { head: Some(oid('h')), target: None }))]
    #[case::deleted_in_head_changed_in_target(Some('s'), None, Some('g'), Some(FileAction::Conflict { head: None, target: Some(oid('g')) }))]
    #[case::added_only_in_target(None, None, Some('g'), Some(FileAction::TakeTarget(oid('g'))))]
    #[case::added_only_in_head(None, Some('h'), None, None)]
    #[case::added_identically(None, Some('a'), Some('a'), None)]
    #[case::added_differently(None, Some('h'), Some('g'), Some(FileAction::Conflict { head: Some(oid('h')), target: Some(oid('g')) }))]
    fn classification_table(
        #[case] split: Option<char>,
        #[case] head: Option<char>,
        #[case] target: Option<char>,
        #[case] expected: Option<FileAction>,
    ) {
        let (split, head, target) = (option_oid(split), option_oid(head), option_oid(target));

        assert_eq!(
            classify(split.as_ref(), head.as_ref(), target.as_ref()),
            expected
        );
    }

    #[test]
    fn three_pairwise_distinct_versions_conflict_once() {
        let split = FileTree::from_iter([(PathBuf::from("f"), oid('1'))]);
        let head = FileTree::from_iter([(PathBuf::from("f"), oid('2'))]);
        let target = FileTree::from_iter([(PathBuf::from("f"), oid('3'))]);

        let plan = MergePlan::build(Some(&split), &head, &target);

        assert!(plan.has_conflicts());
        assert_eq!(plan.actions().count(), 1);
    }

    #[test]
    fn files_added_on_both_sides_merge_cleanly() {
        let split = FileTree::from_iter([(PathBuf::from("base"), oid('1'))]);
        let head = FileTree::from_iter([
            (PathBuf::from("base"), oid('1')),
            (PathBuf::from("ours"), oid('2')),
        ]);
        let target = FileTree::from_iter([
            (PathBuf::from("base"), oid('1')),
            (PathBuf::from("theirs"), oid('3')),
        ]);

        let plan = MergePlan::build(Some(&split), &head, &target);

        assert!(!plan.has_conflicts());
        assert_eq!(
            plan.actions().collect::<Vec<_>>(),
            vec![(&PathBuf::from("theirs"), &FileAction::TakeTarget(oid('3')))]
        );
    }

    #[test]
    fn conflict_marker_frames_both_sides() {
        let marker = conflict_marker(Some(b"ours\n"), None);

        assert_eq!(marker, Bytes::from_static(b"<<<<<<< HEAD\nours\n=======\n>>>>>>>\n"));
    }
}
