//! Content-addressed object store
//!
//! Objects live under `.gitlet/objects/<2 hex>/<38 hex>`, zlib compressed, and are
//! written through a temporary file that is renamed into place. Storing is
//! idempotent: an object that already exists is never rewritten.

use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const TEMP_PREFIX: &str = "tmp-obj-";

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
    /// Commits already parsed during this invocation, keyed by id
    commit_cache: RefCell<HashMap<ObjectId, SlimCommit>>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database {
            path,
            commit_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        if !object_path.exists() {
            let object_content = object.serialize()?;
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object_content)?;
            tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");
        }

        Ok(object_id)
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Blob::deserialize(object_reader).map_err(|err| {
                Self::corrupt(object_id, format!("invalid blob: {err}"))
            }),
            other => Err(Self::corrupt(object_id, format!("expected blob, found {other}"))),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Commit::deserialize(object_reader).map_err(|err| {
                Self::corrupt(object_id, format!("invalid commit: {err}"))
            }),
            other => Err(Self::corrupt(
                object_id,
                format!("expected commit, found {other}"),
            )),
        }
    }

    /// Parents and timestamp of a commit, memoized for repeated history walks
    pub fn load_slim_commit(&self, object_id: &ObjectId) -> anyhow::Result<SlimCommit> {
        if let Some(slim) = self.commit_cache.borrow().get(object_id) {
            return Ok(slim.clone());
        }

        let slim = self
            .parse_object_as_commit(object_id)?
            .to_slim(object_id.clone());
        self.commit_cache
            .borrow_mut()
            .insert(object_id.clone(), slim.clone());

        Ok(slim)
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_path = self.path.join(object_id.to_path());
        if !object_path.is_file() {
            return Err(RepositoryError::ObjectNotFound(object_id.to_string()).into());
        }

        let object_content = self.read_object(object_path)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)
            .map_err(|err| Self::corrupt(object_id, err.to_string()))?;

        Ok((object_type, object_reader))
    }

    fn corrupt(object_id: &ObjectId, reason: String) -> anyhow::Error {
        RepositoryError::CorruptObject {
            oid: object_id.to_string(),
            reason,
        }
        .into()
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("{}{}", TEMP_PREFIX, rand::random::<u32>())
    }

    /// Every object id present in the store, in ascending order
    pub fn list_objects(&self) -> anyhow::Result<Vec<ObjectId>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut object_ids = WalkDir::new(&self.path)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let dir_name = entry.path().parent()?.file_name()?.to_str()?.to_string();
                let file_name = entry.file_name().to_str()?;
                if file_name.starts_with(TEMP_PREFIX) {
                    return None;
                }
                ObjectId::try_parse(format!("{}{}", dir_name, file_name)).ok()
            })
            .collect::<Vec<_>>();
        object_ids.sort();

        Ok(object_ids)
    }

    /// Every stored commit id, in ascending order
    pub fn list_commits(&self) -> anyhow::Result<Vec<ObjectId>> {
        let mut commits = Vec::new();

        for object_id in self.list_objects()? {
            if self.get_object_type(&object_id)? == ObjectType::Commit {
                commits.push(object_id);
            }
        }

        Ok(commits)
    }

    /// Find all commits whose id starts with the given prefix
    ///
    /// For prefixes of 2+ characters only the matching fan-out directory is searched.
    /// Blobs sharing the prefix are not candidates.
    pub fn find_commits_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        if prefix.is_empty()
            || prefix.len() > OBJECT_ID_LENGTH
            || !prefix.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Ok(Vec::new());
        }

        let candidates = if prefix.len() >= 2 {
            let dir_name = &prefix[..2];
            let file_prefix = &prefix[2..];
            let dir_path = self.path.join(dir_name);

            let mut candidates = Vec::new();
            if dir_path.is_dir() {
                for entry in std::fs::read_dir(&dir_path)? {
                    let entry = entry?;
                    let file_name = entry.file_name();
                    let file_name_str = file_name.to_string_lossy();

                    if file_name_str.starts_with(file_prefix)
                        && let Ok(oid) = ObjectId::try_parse(format!("{}{}", dir_name, file_name_str))
                    {
                        candidates.push(oid);
                    }
                }
            }
            candidates
        } else {
            self.list_objects()?
                .into_iter()
                .filter(|oid| oid.starts_with(&prefix))
                .collect()
        };

        let mut matches = Vec::new();
        for oid in candidates {
            if self.get_object_type(&oid)? == ObjectType::Commit {
                matches.push(oid);
            }
        }
        matches.sort();

        Ok(matches)
    }
}
