//! File tree of a commit
//!
//! A commit records the *complete* set of tracked files as a flat mapping from
//! repository-relative path to blob id. Keys are unique and kept sorted, which makes
//! the commit encoding canonical.
//!
//! ## Format
//!
//! Inside the commit content, one line per entry:
//! `file <blob-sha> <path>`

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const FILE_ENTRY_PREFIX: &str = "file ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    entries: BTreeMap<PathBuf, ObjectId>,
}

impl FileTree {
    pub fn new() -> Self {
        FileTree::default()
    }

    pub fn get(&self, path: &Path) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn insert(&mut self, path: PathBuf, oid: ObjectId) -> Option<ObjectId> {
        self.entries.insert(path, oid)
    }

    pub fn remove(&mut self, path: &Path) -> Option<ObjectId> {
        self.entries.remove(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &ObjectId)> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.keys()
    }

    /// Apply pending removals, then pending additions
    ///
    /// Additions are applied last so an addition always wins over a stale removal
    /// of the same path.
    pub fn fold<'a>(
        &mut self,
        additions: impl IntoIterator<Item = (&'a PathBuf, &'a ObjectId)>,
        removals: impl IntoIterator<Item = &'a PathBuf>,
    ) {
        for path in removals {
            self.entries.remove(path);
        }

        for (path, oid) in additions {
            self.entries.insert(path.clone(), oid.clone());
        }
    }

    pub(crate) fn encode_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(path, oid)| format!("{}{} {}", FILE_ENTRY_PREFIX, oid, path.display()))
            .collect()
    }

    pub(crate) fn decode_line(&mut self, line: &str) -> anyhow::Result<()> {
        let entry = line
            .strip_prefix(FILE_ENTRY_PREFIX)
            .ok_or_else(|| anyhow::anyhow!("invalid file entry line: {}", line))?;
        let (oid, path) = entry
            .split_once(' ')
            .ok_or_else(|| anyhow::anyhow!("invalid file entry line: {}", line))?;

        if path.is_empty() {
            anyhow::bail!("file entry without a path: {}", line);
        }

        let oid = ObjectId::try_parse(oid.to_string())?;
        if self.entries.insert(PathBuf::from(path), oid).is_some() {
            anyhow::bail!("duplicate file entry: {}", path);
        }

        Ok(())
    }
}

impl FromIterator<(PathBuf, ObjectId)> for FileTree {
    fn from_iter<T: IntoIterator<Item = (PathBuf, ObjectId)>>(iter: T) -> Self {
        FileTree {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn addition_wins_over_stale_removal() {
        let mut tree = FileTree::from_iter([
            (PathBuf::from("a.txt"), oid('1')),
            (PathBuf::from("b.txt"), oid('2')),
        ]);
        let additions = [(PathBuf::from("a.txt"), oid('3'))];
        let removals = [PathBuf::from("a.txt"), PathBuf::from("b.txt")];

        tree.fold(additions.iter().map(|(p, o)| (p, o)), removals.iter());

        assert_eq!(
            tree,
            FileTree::from_iter([(PathBuf::from("a.txt"), oid('3'))])
        );
    }

    #[test]
    fn paths_with_spaces_survive_encoding() {
        let tree = FileTree::from_iter([(PathBuf::from("dir/my file.txt"), oid('a'))]);

        let mut decoded = FileTree::new();
        for line in tree.encode_lines() {
            decoded.decode_line(&line).unwrap();
        }

        assert_eq!(decoded, tree);
    }

    #[test]
    fn duplicate_entries_are_rejected() {
        let mut tree = FileTree::new();
        let line = format!("file {} a.txt", oid('b'));

        tree.decode_line(&line).unwrap();
        assert!(tree.decode_line(&line).is_err());
    }
}
