use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::staging::{HEADER_SIZE, SIGNATURE, VERSION};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StagingHeader {
    pub marker: String,
    pub version: u32,
    pub additions_count: u32,
    pub removals_count: u32,
}

impl StagingHeader {
    pub fn empty() -> Self {
        StagingHeader::new(String::from(SIGNATURE), VERSION, 0, 0)
    }
}

impl Packable for StagingHeader {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut header_bytes = Vec::with_capacity(HEADER_SIZE);

        header_bytes.write_all(self.marker.as_bytes())?;
        header_bytes.write_u32::<byteorder::NetworkEndian>(self.version)?;
        header_bytes.write_u32::<byteorder::NetworkEndian>(self.additions_count)?;
        header_bytes.write_u32::<byteorder::NetworkEndian>(self.removals_count)?;

        Ok(Bytes::from(header_bytes))
    }
}

impl Unpackable for StagingHeader {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let bytes = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        if bytes.len() != HEADER_SIZE {
            anyhow::bail!("Invalid staging header size: {}", bytes.len());
        }

        let marker = String::from_utf8(bytes[0..4].to_vec())?;
        let version = byteorder::NetworkEndian::read_u32(&bytes[4..8]);
        let additions_count = byteorder::NetworkEndian::read_u32(&bytes[8..12]);
        let removals_count = byteorder::NetworkEndian::read_u32(&bytes[12..16]);

        Ok(StagingHeader::new(
            marker,
            version,
            additions_count,
            removals_count,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn header_has_fixed_size() {
        let header = StagingHeader::new(String::from(SIGNATURE), VERSION, 3, 1);
        let bytes = header.serialize().unwrap();

        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(
            StagingHeader::deserialize(Cursor::new(bytes.to_vec())).unwrap(),
            header
        );
    }
}
