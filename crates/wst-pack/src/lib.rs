//! Snapshot files for World-State Trees.
//!
//! A snapshot is a sequence of serializable items, typically aggregated
//! [`Mapping`](wst_types::Mapping) states, written to a single file. Each item
//! is bincode-encoded, zstd-compressed, and CRC-checked.
//!
//! - [`SnapshotWriter`]: queues items and writes the file
//! - [`SnapshotReader`]: validates the header and decodes items in order

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{PackError, PackResult};
pub use reader::SnapshotReader;
pub use writer::{SnapshotFile, SnapshotWriter};
