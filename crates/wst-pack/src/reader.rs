use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{PackError, PackResult};
use crate::writer::{decode_varint, HEADER_LEN, MAGIC, VERSION};

/// Two one-byte varints and a CRC32.
const MIN_ENTRY_LEN: usize = 6;

/// Reads the items of a snapshot file back in write order.
#[derive(Debug)]
pub struct SnapshotReader {
    data: Vec<u8>,
    count: usize,
}

impl SnapshotReader {
    /// Open from raw bytes, validating the header.
    pub fn from_bytes(data: Vec<u8>) -> PackResult<Self> {
        if data.len() < HEADER_LEN {
            return Err(PackError::CorruptEntry {
                offset: 0,
                reason: "snapshot data too short".into(),
            });
        }
        if &data[0..4] != MAGIC {
            return Err(PackError::InvalidMagic {
                expected: String::from_utf8_lossy(MAGIC).into(),
                actual: String::from_utf8_lossy(&data[0..4]).into(),
            });
        }
        let version = read_u32(&data[4..8]);
        if version != VERSION {
            return Err(PackError::UnsupportedVersion(version));
        }
        let count = read_u32(&data[8..12]) as usize;
        let room = (data.len() - HEADER_LEN) / MIN_ENTRY_LEN;
        if count > room {
            return Err(PackError::CorruptEntry {
                offset: 8,
                reason: format!("header claims {count} items but data holds at most {room}"),
            });
        }
        Ok(Self { data, count })
    }

    pub fn open(path: &Path) -> PackResult<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    /// Number of items recorded in the header.
    pub fn item_count(&self) -> usize {
        self.count
    }

    /// Decode every item.
    pub fn read_all<T: DeserializeOwned>(&self) -> PackResult<Vec<T>> {
        let mut items = Vec::new();
        let mut pos = HEADER_LEN;
        for index in 0..self.count {
            let (payload, next) = self.read_entry(index, pos)?;
            let item = bincode::deserialize(&payload)
                .map_err(|e| PackError::Serialization(e.to_string()))?;
            items.push(item);
            pos = next;
        }
        if pos != self.data.len() {
            return Err(PackError::CorruptEntry {
                offset: pos as u64,
                reason: format!("{} trailing bytes", self.data.len() - pos),
            });
        }
        Ok(items)
    }

    /// Decompressed payload of the entry at `pos` and the offset after it.
    fn read_entry(&self, index: usize, mut pos: usize) -> PackResult<(Vec<u8>, usize)> {
        let data = &self.data;
        let offset = pos as u64;

        let (uncompressed_size, consumed) = decode_varint(&data[pos..], offset)?;
        pos += consumed;
        let (compressed_size, consumed) = decode_varint(&data[pos..], offset)?;
        pos += consumed;

        if pos + 4 > data.len() {
            return Err(PackError::CorruptEntry {
                offset,
                reason: "missing checksum".into(),
            });
        }
        let expected_crc = read_u32(&data[pos..pos + 4]);
        pos += 4;

        let end = pos.saturating_add(compressed_size as usize);
        if end > data.len() {
            return Err(PackError::CorruptEntry {
                offset,
                reason: "compressed data extends beyond snapshot".into(),
            });
        }
        let compressed = &data[pos..end];
        if crc32fast::hash(compressed) != expected_crc {
            return Err(PackError::CrcMismatch { index });
        }

        let payload = zstd::decode_all(compressed)
            .map_err(|e| PackError::DecompressionFailed(e.to_string()))?;
        if payload.len() as u64 != uncompressed_size {
            return Err(PackError::CorruptEntry {
                offset,
                reason: format!(
                    "size mismatch: expected {uncompressed_size}, got {}",
                    payload.len()
                ),
            });
        }
        Ok((payload, end))
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_be_bytes(buf)
}
