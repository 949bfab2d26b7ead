//! Diff engine for World-State Trees.
//!
//! Compares state snapshots structurally, tolerating mixed container kinds.
//! Every operation walks private copies and reports skipped nodes as
//! diagnostics instead of failing.
//!
//! # Key Types
//!
//! - [`compare`] / [`MappingDiffMode`] -- Directional BEFORE/AFTER diff
//! - [`subtract`] / [`SubtractOptions`] -- A − B with multiset sequences
//! - [`dropped`] / [`DroppedOptions`] -- Elements lost between two trees

pub mod compare;
pub mod dropped;
pub mod subtract;

pub use compare::{compare, compare_with, CompareOptions, MappingDiffMode};
pub use dropped::{dropped, DroppedOptions};
pub use subtract::{subtract, SubtractOptions};
