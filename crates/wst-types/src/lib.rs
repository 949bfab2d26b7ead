//! Foundation types for World-State Trees (WST).
//!
//! A world state is a nested key-value tree: object → property → value set.
//! This crate defines the tagged node model every other WST crate operates
//! on, together with the diagnostics channel the algebra reports through.
//!
//! # Key Types
//!
//! - [`Node`] -- Tagged tree node: mapping, sequence, or scalar
//! - [`Mapping`] -- String-keyed mapping, unordered or order-preserving
//! - [`Sequence`] / [`SeqKind`] -- List, tuple, or set container
//! - [`Scalar`] -- Primitive leaf value
//! - [`NodeKind`] -- Container kind used for mismatch detection
//! - [`TreeWalk`] -- Path, depth guard, and diagnostics for one recursive pass
//! - [`Outcome`] / [`Diagnostic`] -- Primary result plus non-fatal findings

pub mod descriptor;
pub mod diagnostic;
pub mod error;
pub mod flat;
pub mod mapping;
pub mod node;
pub mod render;
pub mod scalar;
pub mod sequence;
pub mod walk;

pub use descriptor::{class_prefix, instance_name};
pub use diagnostic::{Diagnostic, DiagnosticKind, KeyPath, Outcome};
pub use error::{TreeError, TreeResult};
pub use mapping::Mapping;
pub use node::{Node, NodeKind, Pairing};
pub use scalar::Scalar;
pub use sequence::{SeqKind, Sequence};
pub use walk::{TreeWalk, DEFAULT_MAX_DEPTH};
