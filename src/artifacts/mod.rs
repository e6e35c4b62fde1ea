//! Version-control data structures and algorithms
//!
//! - `branch`: Branch names, the in-memory branch table and commit-id resolution
//! - `checkout`: Working tree migrations and untracked file detection
//! - `core`: Error taxonomy, settings, logging and the pager writer
//! - `log`: Commit record formatting for `log`, `global-log` and `find`
//! - `merge`: Ancestor walk, split point discovery and three-way file classification
//! - `objects`: Object types (blob, commit) and their identifiers
//! - `staging`: On-disk staging file format
//! - `status`: Working tree status report

pub mod branch;
pub mod checkout;
pub mod core;
pub mod log;
pub mod merge;
pub mod objects;
pub mod staging;
pub mod status;
