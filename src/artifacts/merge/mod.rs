//! Merge engine
//!
//! - `split_point`: ancestor walk over the commit graph and split-point discovery
//! - `merge_plan`: per-file three-way classification and conflict markers

use crate::artifacts::objects::object_id::ObjectId;

pub mod merge_plan;
pub mod split_point;

/// Result of a `merge` that passed its preconditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The target tip is already an ancestor of HEAD
    UpToDate,
    /// HEAD had no commits since diverging; the current branch moved to the target tip
    FastForwarded,
    /// A merge commit with two parents was created
    Merged(ObjectId),
    /// At least one path conflicted; changes are staged but nothing was committed
    Conflicted,
}
