//! Checkout operations and conflict handling
//!
//! Switching the working tree from one commit's tree to another's:
//! - Detecting untracked files the switch would overwrite
//! - Planning deletions of files only the old tree tracks
//! - Planning writes of every file the new tree tracks
//!
//! All conflicts are detected before the working directory is touched.

pub mod conflict;
pub mod migration;
