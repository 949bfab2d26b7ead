use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{PackError, PackResult};

pub(crate) const MAGIC: &[u8; 4] = b"WSTS";
pub(crate) const VERSION: u32 = 1;
pub(crate) const HEADER_LEN: usize = 12;

const ZSTD_LEVEL: i32 = 3;

/// Result of writing a snapshot file.
#[derive(Clone, Debug)]
pub struct SnapshotFile {
    pub path: PathBuf,
    pub item_count: usize,
    pub bytes_written: u64,
}

/// Builds a snapshot file from a series of serializable items.
///
/// Layout: `WSTS` magic, big-endian version and item count, then per item a
/// varint uncompressed size, a varint compressed size, a big-endian CRC32 of
/// the compressed bytes, and the zstd-compressed bincode payload.
#[derive(Debug, Default)]
pub struct SnapshotWriter {
    payloads: Vec<Vec<u8>>,
}

impl SnapshotWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `item` and queue it.
    pub fn add<T: Serialize + ?Sized>(&mut self, item: &T) -> PackResult<()> {
        let payload =
            bincode::serialize(item).map_err(|e| PackError::Serialization(e.to_string()))?;
        self.payloads.push(payload);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Write every item in `items` to `folder/file_name` in one go.
    ///
    /// The folder is created if absent and an existing file of the same
    /// name is replaced.
    pub fn write<'a, T, I>(folder: &Path, file_name: &str, items: I) -> PackResult<SnapshotFile>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut writer = Self::new();
        for item in items {
            writer.add(item)?;
        }
        writer.finish(folder, file_name)
    }

    /// Write the queued items to `folder/file_name`.
    pub fn finish(self, folder: &Path, file_name: &str) -> PackResult<SnapshotFile> {
        let name = Path::new(file_name);
        if file_name.is_empty() || name.file_name() != Some(name.as_os_str()) {
            return Err(PackError::InvalidFileName(name.to_path_buf()));
        }
        std::fs::create_dir_all(folder)?;
        let path = folder.join(name);
        let item_count = self.len();
        let bytes = self.finish_to_bytes()?;
        std::fs::write(&path, &bytes)?;
        debug!(path = %path.display(), items = item_count, bytes = bytes.len(), "wrote snapshot");
        Ok(SnapshotFile {
            path,
            item_count,
            bytes_written: bytes.len() as u64,
        })
    }

    /// Build the snapshot bytes in memory (no disk I/O).
    pub fn finish_to_bytes(self) -> PackResult<Vec<u8>> {
        let mut data = Vec::with_capacity(HEADER_LEN);
        data.extend_from_slice(MAGIC);
        data.extend_from_slice(&VERSION.to_be_bytes());
        data.extend_from_slice(&(self.payloads.len() as u32).to_be_bytes());

        for payload in &self.payloads {
            let compressed = zstd::encode_all(payload.as_slice(), ZSTD_LEVEL)
                .map_err(|e| PackError::CompressionFailed(e.to_string()))?;
            encode_varint(&mut data, payload.len() as u64);
            encode_varint(&mut data, compressed.len() as u64);
            data.extend_from_slice(&crc32fast::hash(&compressed).to_be_bytes());
            data.extend_from_slice(&compressed);
        }
        Ok(data)
    }
}

/// Encode a u64 as a variable-length integer.
pub(crate) fn encode_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value > 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Decode a variable-length integer. Returns (value, bytes_consumed).
pub(crate) fn decode_varint(data: &[u8], offset: u64) -> PackResult<(u64, usize)> {
    let mut value: u64 = 0;
    let mut shift = 0;
    for (i, &byte) in data.iter().enumerate() {
        value |= ((byte & 0x7F) as u64) << shift;
        shift += 7;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        if shift >= 64 {
            return Err(PackError::CorruptEntry {
                offset,
                reason: "varint overflow".into(),
            });
        }
    }
    Err(PackError::CorruptEntry {
        offset,
        reason: "truncated varint".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_roundtrip() {
        for value in [0, 42, 127, 128, 1_000_000, u64::MAX] {
            let mut buf = Vec::new();
            encode_varint(&mut buf, value);
            assert_eq!(decode_varint(&buf, 0).unwrap(), (value, buf.len()));
        }
    }

    #[test]
    fn decode_varint_truncated() {
        let err = decode_varint(&[0x80], 7).unwrap_err();
        assert!(matches!(err, PackError::CorruptEntry { offset: 7, .. }));
    }

    #[test]
    fn header_layout() {
        let mut writer = SnapshotWriter::new();
        writer.add(&"state").unwrap();
        let bytes = writer.finish_to_bytes().unwrap();
        assert_eq!(&bytes[0..4], MAGIC);
        assert_eq!(bytes[4..8], 1u32.to_be_bytes());
        assert_eq!(bytes[8..12], 1u32.to_be_bytes());
    }

    #[test]
    fn rejects_nested_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let err = SnapshotWriter::new()
            .finish(dir.path(), "sub/states.wst")
            .unwrap_err();
        assert!(matches!(err, PackError::InvalidFileName(_)));
        let err = SnapshotWriter::new().finish(dir.path(), "").unwrap_err();
        assert!(matches!(err, PackError::InvalidFileName(_)));
    }
}
