//! Read-side helpers over World-State Trees.
//!
//! - [`keys_at_depth`] / [`values_at_depth`] -- Collect a fixed nesting level
//! - [`filter_empty`] / [`FilterOptions`] / [`ScalarRetention`] -- Prune empty branches

pub mod depth;
pub mod filter;

pub use depth::{keys_at_depth, values_at_depth};
pub use filter::{filter_empty, FilterOptions, ScalarRetention};
