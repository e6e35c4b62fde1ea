//! Core repository components
//!
//! This module contains the fundamental building blocks of a gitlet repository:
//!
//! - `database`: Object store for blobs and commits, keyed by content hash
//! - `refs`: Branch table persistence (branch tips and HEAD)
//! - `staging`: Staging area file holding pending additions and removals
//! - `repository`: High-level repository operations and coordination
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod refs;
pub mod repository;
pub mod staging;
pub mod workspace;
