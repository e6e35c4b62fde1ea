//! Object types and operations
//!
//! All content is stored as immutable objects identified by SHA-1 hashes:
//!
//! - **Blob**: File content (raw bytes)
//! - **Commit**: Snapshot with metadata (message, timestamp, parent commits, file tree)
//!
//! All objects implement serialization/deserialization for the on-disk object format:
//! `<type> <size>\0<content>`

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in binary format
pub const OBJECT_ID_BYTES: usize = OBJECT_ID_LENGTH / 2;

/// Length of the abbreviated ids printed for merge parents
pub const SHORT_OID_LENGTH: usize = 7;
