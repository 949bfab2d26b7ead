use thiserror::Error;

use crate::diagnostic::KeyPath;
use crate::node::NodeKind;

/// Fatal errors raised by tree operations.
///
/// Kind mismatches are not errors; they are reported as
/// [`Diagnostic`](crate::Diagnostic)s alongside the result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The tree nests deeper than the configured limit. Trees are assumed
    /// acyclic and finite; this guards against pathological input.
    #[error("nesting depth limit of {limit} exceeded at {path}")]
    DepthExceeded { limit: usize, path: KeyPath },

    /// A whole tree was required but the input is some other kind of node.
    #[error("expected a mapping at the top level, found {kind}")]
    NotAMapping { kind: NodeKind },
}

/// Result alias for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
