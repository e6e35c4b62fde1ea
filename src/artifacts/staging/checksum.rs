//! Checksummed access to the locked staging file
//!
//! Every byte read or written passes through a SHA-1 hasher so the trailing checksum
//! can be verified on load and produced on save.

use crate::artifacts::staging::CHECKSUM_SIZE;
use bytes::Bytes;
use file_guard::FileGuard;
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{Read, Write};
use std::ops::DerefMut;

pub struct Checksum<'f> {
    file: FileGuard<&'f mut File>,
    digest: Sha1,
}

impl<'f> Checksum<'f> {
    pub fn new(file: FileGuard<&'f mut File>) -> Self {
        Checksum {
            file,
            digest: Sha1::new(),
        }
    }

    pub fn read(&mut self, size: usize) -> anyhow::Result<Bytes> {
        let mut buffer = vec![0; size];
        self.file
            .deref_mut()
            .read_exact(&mut buffer)
            .map_err(|_| anyhow::anyhow!("Unexpected end-of-file while reading staging file"))?;

        self.digest.update(&buffer);

        Ok(Bytes::from(buffer))
    }

    pub fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.file.deref_mut().write_all(data)?;
        self.digest.update(data);

        Ok(())
    }

    pub fn write_checksum(mut self) -> anyhow::Result<()> {
        let checksum = self.digest.clone().finalize();
        self.file.deref_mut().write_all(&checksum)?;
        self.file.deref_mut().flush()?;

        Ok(())
    }

    pub fn verify(mut self) -> anyhow::Result<()> {
        let mut stored = vec![0; CHECKSUM_SIZE];
        self.file
            .deref_mut()
            .read_exact(&mut stored)
            .map_err(|_| anyhow::anyhow!("Staging file is missing its checksum"))?;

        let expected = self.digest.finalize();
        if stored.as_slice() != expected.as_slice() {
            anyhow::bail!("Checksum does not match value stored on disk");
        }

        Ok(())
    }
}
