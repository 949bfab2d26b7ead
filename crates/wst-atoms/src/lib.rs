//! Atoms and the atom aggregator.
//!
//! An atom is a single fact, `object+property+value`, encoded as a delimited
//! string. The aggregator folds an ordered list of atoms into a state tree
//! `object → property → values` under one of several policies.
//!
//! # Key Types
//!
//! - [`Atom`] / [`AtomValue`] -- A parsed fact
//! - [`AggregatePolicy`] -- How repeated (object, property) pairs combine
//! - [`StateBuilder`] -- Incremental aggregation; [`aggregate`] for one shot

pub mod aggregate;
pub mod atom;
pub mod error;

pub use aggregate::{aggregate, AggregatePolicy, StateBuilder};
pub use atom::{Atom, AtomValue, DEFAULT_SEPARATOR};
pub use error::{AtomError, AtomResult};
