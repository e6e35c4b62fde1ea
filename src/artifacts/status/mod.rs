//! Working tree status inspection
//!
//! Compares the working tree against the staging area and the HEAD commit's tree.
//!
//! ## Components
//!
//! - `file_change`: categories of unstaged changes
//! - `status_info`: status collection and display

pub mod file_change;
pub mod status_info;
