use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::NodeKind;

/// Path of keys from the root of a tree to a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn push(&mut self, key: &str) {
        self.0.push(key.to_string());
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        write!(f, "{}", self.0.join("/"))
    }
}

impl<S: Into<String>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// What went wrong at a node that was skipped rather than failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// The two sides hold container kinds that cannot be reconciled.
    TypeMismatch { left: NodeKind, right: NodeKind },
    /// A sequence needed set coercion but holds unhashable elements.
    Unhashable { kind: NodeKind },
    /// A key requested through an allowlist is absent from the tree.
    MissingKey,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { left, right } => write!(f, "type mismatch: {left} vs {right}"),
            Self::Unhashable { kind } => write!(f, "{kind} holds elements that cannot form a set"),
            Self::MissingKey => write!(f, "key not present"),
        }
    }
}

/// A non-fatal issue found while walking a tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub path: KeyPath,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// The primary result of an operation plus any diagnostics collected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Outcome<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// Returns `true` if nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Number of type-mismatch diagnostics.
    pub fn mismatches(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.kind, DiagnosticKind::TypeMismatch { .. }))
            .count()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}
