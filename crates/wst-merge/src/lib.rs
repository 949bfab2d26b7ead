//! Merge engine for World-State Trees.
//!
//! Combines two state snapshots either by union, with a configurable policy
//! for conflicting scalars and sequences, or by intersection, keeping only
//! what both snapshots agree on.
//!
//! # Key Types
//!
//! - [`merge`] / [`MergeOptions`] / [`MergeOutcome`] -- Union with conflict flag
//! - [`intersect`] / [`IntersectOptions`] -- Unchanged subset of two trees

pub mod intersect;
pub mod merge;

pub use intersect::{intersect, IntersectOptions};
pub use merge::{merge, MergeOptions, MergeOutcome};
