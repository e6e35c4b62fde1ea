//! Staging area file format
//!
//! The staging file records pending additions and removals between commits.
//!
//! ## File Format (Version 1)
//!
//! ```text
//! Header (16 bytes):
//!   - Signature: "STAG" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Addition count (4 bytes)
//!   - Removal count (4 bytes)
//!
//! Additions (variable length):
//!   - Blob id (20 bytes)
//!   - Path length (2 bytes) followed by the path
//!
//! Removals (variable length):
//!   - Path length (2 bytes) followed by the path
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod staging_entry;
pub mod staging_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of staging header in bytes
pub const HEADER_SIZE: usize = 16;

/// Magic signature identifying staging files
pub const SIGNATURE: &str = "STAG";

/// Staging file format version
pub const VERSION: u32 = 1;

/// Size of the length prefix in front of every path
pub const PATH_LENGTH_SIZE: usize = 2;
