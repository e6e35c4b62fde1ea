//! Staging file entries
//!
//! Additions carry the blob id staged for a path; removals carry only the path.
//! Paths are stored as UTF-8 with a big-endian `u16` length prefix.

use crate::artifacts::objects::OBJECT_ID_BYTES;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::staging::PATH_LENGTH_SIZE;
use crate::artifacts::staging::checksum::Checksum;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_PATH_SIZE: usize = u16::MAX as usize;

pub fn serialize_addition(path: &Path, oid: &ObjectId) -> anyhow::Result<Bytes> {
    let mut entry_bytes = Vec::new();
    oid.write_h40_to(&mut entry_bytes)?;
    write_path(&mut entry_bytes, path)?;

    Ok(Bytes::from(entry_bytes))
}

pub fn serialize_removal(path: &Path) -> anyhow::Result<Bytes> {
    let mut entry_bytes = Vec::new();
    write_path(&mut entry_bytes, path)?;

    Ok(Bytes::from(entry_bytes))
}

pub fn read_addition(reader: &mut Checksum) -> anyhow::Result<(PathBuf, ObjectId)> {
    let oid_bytes = reader.read(OBJECT_ID_BYTES)?;
    let oid = ObjectId::read_h40_from(&oid_bytes)?;
    let path = read_path(reader)?;

    Ok((path, oid))
}

pub fn read_removal(reader: &mut Checksum) -> anyhow::Result<PathBuf> {
    read_path(reader)
}

fn write_path(entry_bytes: &mut Vec<u8>, path: &Path) -> anyhow::Result<()> {
    let path = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid staged path: {}", path.display()))?;

    if path.is_empty() || path.len() > MAX_PATH_SIZE {
        anyhow::bail!("Staged path has invalid length: {}", path.len());
    }

    entry_bytes.write_u16::<byteorder::NetworkEndian>(path.len() as u16)?;
    entry_bytes.write_all(path.as_bytes())?;

    Ok(())
}

fn read_path(reader: &mut Checksum) -> anyhow::Result<PathBuf> {
    let length_bytes = reader.read(PATH_LENGTH_SIZE)?;
    let length = byteorder::NetworkEndian::read_u16(&length_bytes) as usize;

    if length == 0 {
        anyhow::bail!("Empty path in staging file");
    }

    let path_bytes = reader.read(length)?;
    let path = String::from_utf8(path_bytes.to_vec())?;

    Ok(PathBuf::from(path))
}
