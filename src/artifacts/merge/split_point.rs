//! Ancestor walk and split-point search
//!
//! ## Algorithm
//!
//! The ancestors of a commit are enumerated depth-first in preorder, following a
//! merge commit's own (first) parent before its second parent. The walk uses an
//! explicit stack, so deep histories do not grow the call stack.
//!
//! The split point of HEAD and a target tip is the first commit, in the target's
//! ancestor order, that is also an ancestor of HEAD.
//!
//! This is a nearest-common-ancestor heuristic. With several merge bases (criss-cross
//! histories) the first match in traversal order is returned, which is not necessarily
//! a lowest common ancestor.
//!
//! ## Malformed graphs
//!
//! A parent edge leading back to a commit that is still on the walk stack means the
//! graph has a cycle; the walk fails with [`RepositoryError::CorruptHistory`] instead of
//! looping.

use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{HashMap, HashSet};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const ON_PATH = 0b01;
        const DONE = 0b10;
    }
}

struct Frame {
    parents: Vec<ObjectId>,
    oid: ObjectId,
    next: usize,
}

impl Frame {
    fn next_parent(&mut self) -> Option<ObjectId> {
        let parent = self.parents.get(self.next).cloned();
        self.next += 1;

        parent
    }
}

/// Walks the commit graph through a caller-supplied commit loader
///
/// The loader decouples the walk from storage: the repository passes
/// [`crate::areas::database::Database::load_slim_commit`], tests pass an in-memory map.
pub struct SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// `start` and all of its ancestors, each once, in depth-first preorder
    pub fn ancestors(&self, start: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
        let mut states: HashMap<ObjectId, VisitState> = HashMap::new();
        let mut order = Vec::new();
        let mut stack = Vec::new();

        let root = (self.commit_loader)(start)?;
        states.insert(start.clone(), VisitState::ON_PATH);
        order.push(start.clone());
        stack.push(Frame {
            parents: root.parents,
            oid: start.clone(),
            next: 0,
        });

        while let Some(frame) = stack.last_mut() {
            match frame.next_parent() {
                Some(parent) => match states.get(&parent) {
                    Some(state) if state.contains(VisitState::ON_PATH) => {
                        tracing::warn!(commit = %parent, "cycle in commit graph");
                        return Err(RepositoryError::CorruptHistory(parent.to_string()).into());
                    }
                    Some(_) => {}
                    None => {
                        let commit = (self.commit_loader)(&parent)?;
                        states.insert(parent.clone(), VisitState::ON_PATH);
                        order.push(parent.clone());
                        stack.push(Frame {
                            parents: commit.parents,
                            oid: parent,
                            next: 0,
                        });
                    }
                },
                None => {
                    if let Some(done) = stack.pop() {
                        states.insert(done.oid, VisitState::DONE);
                    }
                }
            }
        }

        Ok(order)
    }

    pub fn ancestor_set(&self, start: &ObjectId) -> anyhow::Result<HashSet<ObjectId>> {
        Ok(self.ancestors(start)?.into_iter().collect())
    }

    /// First ancestor of `target` (in walk order) found in `head_ancestors`
    ///
    /// `None` only when the two histories share no commit at all.
    pub fn split_point_within(
        &self,
        head_ancestors: &HashSet<ObjectId>,
        target: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let split = self
            .ancestors(target)?
            .into_iter()
            .find(|oid| head_ancestors.contains(oid));

        tracing::debug!(
            target = %target,
            split = ?split.as_ref().map(|oid| oid.to_short_oid()),
            "computed split point"
        );

        Ok(split)
    }
}
