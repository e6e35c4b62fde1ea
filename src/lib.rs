//! gitlet: a local, single-user version-control engine
//!
//! - `areas`: persisted repository components (object store, refs, staging, workspace)
//! - `artifacts`: data structures and algorithms operating on those components
//! - `commands`: one `impl Repository` block per user-facing operation

pub mod areas;
pub mod artifacts;
pub mod commands;
