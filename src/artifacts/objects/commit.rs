//! Commit object
//!
//! Commits represent snapshots of the working tree at specific points in time.
//! They contain:
//! - Parent commit ID(s): none for the initial commit, one for ordinary commits,
//!   two for merge commits
//! - A timestamp
//! - The complete file tree (path to blob id)
//! - Commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>
//! timestamp <Thu Jan 01 00:00:00 1970 +0000>
//! file <blob-sha> <path>
//!
//! <commit message>
//! ```
//!
//! The file tree is part of the hashed content, so two commits with the same message,
//! parents and timestamp but different trees never share an id.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame_object};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::{FILE_ENTRY_PREFIX, FileTree};
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::io::BufRead;

pub const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

const PARENT_PREFIX: &str = "parent ";
const TIMESTAMP_PREFIX: &str = "timestamp ";
const MAX_PARENTS: usize = 2;

/// Slim representation of a commit
///
/// Contains only what the ancestor walk needs.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: DateTime<FixedOffset>,
}

/// Immutable snapshot record
///
/// A merge commit is simply a commit with two parents.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    parents: Vec<ObjectId>,
    timestamp: DateTime<FixedOffset>,
    tree: FileTree,
    message: String,
}

impl Commit {
    pub fn new(
        parents: Vec<ObjectId>,
        timestamp: DateTime<FixedOffset>,
        tree: FileTree,
        message: String,
    ) -> Self {
        Commit {
            parents,
            timestamp,
            tree,
            message,
        }
    }

    /// The root commit every repository starts with
    pub fn initial() -> Self {
        let epoch = DateTime::UNIX_EPOCH.fixed_offset();
        Commit::new(
            Vec::new(),
            epoch,
            FileTree::new(),
            INITIAL_COMMIT_MESSAGE.to_string(),
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// The first parent, followed by `log`
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() == MAX_PARENTS
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Timestamp as printed by `log`, e.g. "Thu Jan 01 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn to_slim(&self, oid: ObjectId) -> SlimCommit {
        SlimCommit {
            oid,
            parents: self.parents.clone(),
            timestamp: self.timestamp,
        }
    }

    fn encode(&self) -> String {
        let mut header = vec![];

        for parent in &self.parents {
            header.push(format!("{}{}", PARENT_PREFIX, parent));
        }
        header.push(format!("{}{}", TIMESTAMP_PREFIX, self.readable_timestamp()));
        header.extend(self.tree.encode_lines());

        format!("{}\n\n{}", header.join("\n"), self.message)
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        frame_object(self.object_type(), self.encode().as_bytes())
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)?;

        let (header, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut parents = Vec::new();
        let mut timestamp = None;
        let mut tree = FileTree::new();

        for line in header.lines() {
            if let Some(parent) = line.strip_prefix(PARENT_PREFIX) {
                parents.push(ObjectId::try_parse(parent.to_string())?);
            } else if let Some(raw_timestamp) = line.strip_prefix(TIMESTAMP_PREFIX) {
                timestamp = Some(
                    DateTime::parse_from_str(raw_timestamp, TIMESTAMP_FORMAT)
                        .with_context(|| format!("Invalid commit timestamp: {}", raw_timestamp))?,
                );
            } else if line.starts_with(FILE_ENTRY_PREFIX) {
                tree.decode_line(line)?;
            } else {
                anyhow::bail!("Invalid commit object: unexpected line {}", line);
            }
        }

        if parents.len() > MAX_PARENTS {
            anyhow::bail!("Invalid commit object: {} parents", parents.len());
        }

        let timestamp = timestamp.context("Invalid commit object: missing timestamp line")?;

        Ok(Self::new(parents, timestamp, tree, message.to_string()))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_type::ObjectType;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    fn timestamp() -> DateTime<FixedOffset> {
        DateTime::parse_from_str("Sun Jan 01 12:00:00 2023 +0000", TIMESTAMP_FORMAT).unwrap()
    }

    fn decode(commit: &Commit) -> Commit {
        let bytes = commit.serialize().unwrap();
        let mut reader = Cursor::new(bytes.to_vec());
        assert_eq!(
            ObjectType::parse_object_type(&mut reader).unwrap(),
            ObjectType::Commit
        );
        Commit::deserialize(reader).unwrap()
    }

    #[test]
    fn merge_commit_decodes_to_the_same_record_and_id() {
        let tree = FileTree::from_iter([
            (PathBuf::from("a.txt"), oid('1')),
            (PathBuf::from("b/c.txt"), oid('2')),
        ]);
        let commit = Commit::new(
            vec![oid('a'), oid('b')],
            timestamp(),
            tree,
            "Merged feature into master.\n\nwith a body".to_string(),
        );

        let decoded = decode(&commit);

        assert_eq!(decoded, commit);
        assert!(decoded.is_merge());
        assert_eq!(decoded.object_id().unwrap(), commit.object_id().unwrap());
    }

    #[test]
    fn tree_is_part_of_the_identity() {
        let first = Commit::new(
            vec![oid('a')],
            timestamp(),
            FileTree::from_iter([(PathBuf::from("a.txt"), oid('1'))]),
            "same".to_string(),
        );
        let second = Commit::new(
            vec![oid('a')],
            timestamp(),
            FileTree::from_iter([(PathBuf::from("a.txt"), oid('2'))]),
            "same".to_string(),
        );

        assert_ne!(first.object_id().unwrap(), second.object_id().unwrap());
    }

    #[test]
    fn initial_commit_is_stable() {
        let first = Commit::initial();
        let second = decode(&Commit::initial());

        assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        assert_eq!(first.readable_timestamp(), "Thu Jan 01 00:00:00 1970 +0000");
        assert!(first.parent().is_none());
    }

    #[test]
    fn more_than_two_parents_is_corrupt() {
        let content = format!(
            "parent {}\nparent {}\nparent {}\ntimestamp Sun Jan 01 12:00:00 2023 +0000\n\nmsg",
            oid('1'),
            oid('2'),
            oid('3')
        );

        assert!(Commit::deserialize(Cursor::new(content.into_bytes())).is_err());
    }
}
