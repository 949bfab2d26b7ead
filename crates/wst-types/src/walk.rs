use tracing::warn;

use crate::diagnostic::{Diagnostic, DiagnosticKind, KeyPath, Outcome};
use crate::error::{TreeError, TreeResult};
use crate::node::NodeKind;

/// Default nesting limit for every recursive operation.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// State carried through one recursive pass over a tree.
///
/// Tracks the current key path, enforces the depth limit, and collects
/// diagnostics. Each diagnostic is also emitted as a `warn!` event.
#[derive(Debug)]
pub struct TreeWalk {
    operation: &'static str,
    path: KeyPath,
    max_depth: usize,
    diagnostics: Vec<Diagnostic>,
}

impl TreeWalk {
    pub fn new(operation: &'static str, max_depth: usize) -> Self {
        Self {
            operation,
            path: KeyPath::root(),
            max_depth,
            diagnostics: Vec::new(),
        }
    }

    /// Run `f` one level below the current node, under `key`.
    pub fn descend<T>(
        &mut self,
        key: &str,
        f: impl FnOnce(&mut Self) -> TreeResult<T>,
    ) -> TreeResult<T> {
        if self.path.depth() >= self.max_depth {
            let mut path = self.path.clone();
            path.push(key);
            return Err(TreeError::DepthExceeded {
                limit: self.max_depth,
                path,
            });
        }
        self.path.push(key);
        let result = f(self);
        self.path.pop();
        result
    }

    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    /// Record a diagnostic at the current path.
    pub fn report(&mut self, kind: DiagnosticKind) {
        warn!(op = self.operation, path = %self.path, "{kind}");
        self.diagnostics.push(Diagnostic {
            path: self.path.clone(),
            kind,
        });
    }

    pub fn mismatch(&mut self, left: NodeKind, right: NodeKind) {
        self.report(DiagnosticKind::TypeMismatch { left, right });
    }

    pub fn unhashable(&mut self, kind: NodeKind) {
        self.report(DiagnosticKind::Unhashable { kind });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Pair the final value with the collected diagnostics.
    pub fn finish<T>(self, value: T) -> Outcome<T> {
        Outcome {
            value,
            diagnostics: self.diagnostics,
        }
    }
}
