//! User-facing repository operations
//!
//! Each operation is an `impl Repository` block in its own file. Operations that
//! change state follow the same sequence:
//!
//! 1. lock and rehydrate the staging area
//! 2. load the branch table
//! 3. check every precondition
//! 4. mutate the working tree, then persist refs and staging
//!
//! A failed precondition therefore leaves the repository exactly as it was.

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod global_log;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod rm_branch;
pub mod status;
