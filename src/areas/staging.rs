//! Staging area
//!
//! Holds the changes that the next commit will fold into HEAD's file tree:
//! - `additions`: path mapped to the blob id staged for it
//! - `removals`: paths that will be dropped from the tree
//!
//! A path is never staged for addition and removal at the same time; every
//! operation that touches one set clears the path from the other.
//!
//! The area is persisted to `.gitlet/staging` (see [`crate::artifacts::staging`]) and
//! verified with a trailing SHA-1 checksum when loaded.

use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::staging::checksum::Checksum;
use crate::artifacts::staging::staging_entry::{
    read_addition, read_removal, serialize_addition, serialize_removal,
};
use crate::artifacts::staging::staging_header::StagingHeader;
use crate::artifacts::staging::{HEADER_SIZE, SIGNATURE, VERSION};
use anyhow::anyhow;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct StagingArea {
    /// Path to the staging file (typically `.gitlet/staging`)
    path: Box<Path>,
    additions: BTreeMap<PathBuf, ObjectId>,
    removals: BTreeSet<PathBuf>,
    /// Flag indicating if the area has been modified since loading
    changed: bool,
}

impl StagingArea {
    pub fn new(path: Box<Path>) -> Self {
        StagingArea {
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the staging area from disk
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the staging file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions.clear();
        self.removals.clear();
        self.changed = false;

        if !self.path().exists() {
            return Ok(());
        }

        let mut staging_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut staging_file, file_guard::Lock::Shared, 0, 1)?;

        // a freshly initialized repository may leave an empty file behind
        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock);
        let header = Self::parse_header(&mut reader)?;

        for _ in 0..header.additions_count {
            let (path, oid) = read_addition(&mut reader)?;
            self.additions.insert(path, oid);
        }

        for _ in 0..header.removals_count {
            let path = read_removal(&mut reader)?;
            if self.additions.contains_key(&path) {
                return Err(anyhow!(
                    "Staging file lists {} for both addition and removal",
                    path.display()
                ));
            }
            self.removals.insert(path);
        }

        reader.verify()
    }

    fn parse_header(reader: &mut Checksum) -> anyhow::Result<StagingHeader> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = StagingHeader::deserialize(std::io::Cursor::new(header_bytes.to_vec()))?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("Invalid staging file signature"));
        }

        if header.version != VERSION {
            return Err(anyhow!(
                "Unsupported staging file version: {}",
                header.version
            ));
        }

        Ok(header)
    }

    /// Stage `path` for addition with the given blob, cancelling any pending removal
    pub fn stage_add(&mut self, path: PathBuf, oid: ObjectId) {
        self.removals.remove(&path);
        self.additions.insert(path, oid);
        self.changed = true;
    }

    /// Stage `path` for removal, cancelling any pending addition
    pub fn stage_remove(&mut self, path: PathBuf) {
        self.additions.remove(&path);
        self.removals.insert(path);
        self.changed = true;
    }

    /// Drop `path` from both sets
    pub fn unstage(&mut self, path: &Path) {
        let removed_addition = self.additions.remove(path).is_some();
        let removed_removal = self.removals.remove(path);

        self.changed |= removed_addition || removed_removal;
    }

    /// Drop `path` from the addition set only
    pub fn unstage_add(&mut self, path: &Path) -> Option<ObjectId> {
        let oid = self.additions.remove(path);
        self.changed |= oid.is_some();

        oid
    }

    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.changed = true;
        }
        self.additions.clear();
        self.removals.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn staged_addition(&self, path: &Path) -> Option<&ObjectId> {
        self.additions.get(path)
    }

    pub fn is_staged_for_removal(&self, path: &Path) -> bool {
        self.removals.contains(path)
    }

    pub fn additions(&self) -> impl Iterator<Item = (&PathBuf, &ObjectId)> {
        self.additions.iter()
    }

    pub fn removals(&self) -> impl Iterator<Item = &PathBuf> {
        self.removals.iter()
    }

    /// Persist the staging area
    ///
    /// # Locking
    ///
    /// Acquires an exclusive lock on the staging file during writing.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut staging_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;
        let lock = file_guard::lock(&mut staging_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = Checksum::new(lock);

        let header = StagingHeader::new(
            String::from(SIGNATURE),
            VERSION,
            self.additions.len() as u32,
            self.removals.len() as u32,
        );
        writer.write(&header.serialize()?)?;

        for (path, oid) in &self.additions {
            writer.write(&serialize_addition(path, oid)?)?;
        }

        for path in &self.removals {
            writer.write(&serialize_removal(path)?)?;
        }

        writer.write_checksum()?;
        self.changed = false;

        Ok(())
    }
}
