use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("invalid snapshot magic: expected {expected}, got {actual}")]
    InvalidMagic { expected: String, actual: String },

    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    #[error("corrupt snapshot entry at offset {offset}: {reason}")]
    CorruptEntry { offset: u64, reason: String },

    #[error("CRC32 mismatch for item {index}")]
    CrcMismatch { index: usize },

    #[error("decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("compression failed: {0}")]
    CompressionFailed(String),

    #[error("snapshot name must be a plain file name: {0}")]
    InvalidFileName(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type PackResult<T> = Result<T, PackError>;
