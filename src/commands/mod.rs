//! Command implementations
//!
//! - `porcelain`: the user-facing version control workflow (init, add, commit, merge, ...)

pub mod porcelain;
