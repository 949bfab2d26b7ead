//! Directional structural diff of a BEFORE/AFTER pair.
//!
//! The diff reports what AFTER adds or changes relative to BEFORE. Mappings
//! support two deliberately different policies, selected by
//! [`MappingDiffMode`]:
//!
//! - `Additions` walks AFTER's keys: keys new in AFTER are copied wholesale,
//!   shared keys recurse. Keys only in BEFORE are never reported.
//! - `Dropped` walks BEFORE's keys: keys missing from AFTER report the whole
//!   BEFORE subtree, shared keys recurse.
//!
//! Without an explicit mode, the mode follows BEFORE's flavour: unordered
//! mappings diff as `Additions` and ordered mappings as `Dropped`. AFTER's
//! flavour does not matter, so an ordered/unordered pair is not a mismatch.

use serde::{Deserialize, Serialize};
use tracing::debug;
use wst_types::{Mapping, Node, Outcome, Sequence, TreeResult, TreeWalk, DEFAULT_MAX_DEPTH};

/// Policy for diffing a pair of mappings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingDiffMode {
    /// Report keys added or changed in AFTER.
    Additions,
    /// Report BEFORE subtrees whose keys vanished from AFTER.
    Dropped,
}

/// Options for [`compare_with`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompareOptions {
    /// Force one mapping policy at every level. `None` picks the policy from
    /// each BEFORE mapping's flavor.
    pub mode: Option<MappingDiffMode>,
    pub max_depth: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            mode: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Diff `before` against `after` with default options.
///
/// `Ok(None)` in the outcome means there is no difference at the root.
pub fn compare(before: &Node, after: &Node) -> TreeResult<Outcome<Option<Node>>> {
    compare_with(before, after, &CompareOptions::default())
}

/// Diff `before` against `after`.
///
/// A node whose shapes cannot be compared contributes no diff and is
/// recorded as a diagnostic.
pub fn compare_with(
    before: &Node,
    after: &Node,
    options: &CompareOptions,
) -> TreeResult<Outcome<Option<Node>>> {
    let mut walk = TreeWalk::new("compare", options.max_depth);
    let diff = diff_node(&mut walk, before, after, options.mode)?;
    debug!(
        changed = diff.is_some(),
        diagnostics = walk.diagnostics().len(),
        "compared trees"
    );
    Ok(walk.finish(diff))
}

fn diff_node(
    walk: &mut TreeWalk,
    before: &Node,
    after: &Node,
    mode: Option<MappingDiffMode>,
) -> TreeResult<Option<Node>> {
    match (before, after) {
        (Node::Map(b), Node::Map(a)) => {
            let mode = mode.unwrap_or(if b.is_ordered() {
                MappingDiffMode::Dropped
            } else {
                MappingDiffMode::Additions
            });
            let diff = match mode {
                MappingDiffMode::Additions => diff_additions(walk, b, a, mode)?,
                MappingDiffMode::Dropped => diff_dropped(walk, b, a, mode)?,
            };
            Ok(Some(Node::Map(diff)))
        }
        (Node::Seq(b), Node::Seq(a)) => {
            let added: Vec<Node> = a.iter().filter(|item| !b.contains(item)).cloned().collect();
            Ok(Some(Node::Seq(Sequence::with_kind(a.kind(), added))))
        }
        (Node::Scalar(_), _) => Ok((before != after).then(|| after.clone())),
        _ => {
            walk.mismatch(before.kind(), after.kind());
            Ok(None)
        }
    }
}

fn diff_additions(
    walk: &mut TreeWalk,
    before: &Mapping,
    after: &Mapping,
    mode: MappingDiffMode,
) -> TreeResult<Mapping> {
    let mut diff = before.empty_like();
    for (key, a) in after {
        match before.get(key) {
            None => {
                diff.insert(key.clone(), a.clone());
            }
            Some(b) => {
                let nested = walk.descend(key, |w| diff_node(w, b, a, Some(mode)))?;
                // Empty containers, null, and "" carry no change.
                if let Some(node) = nested.filter(|d| !d.is_blank()) {
                    diff.insert(key.clone(), node);
                }
            }
        }
    }
    Ok(diff)
}

fn diff_dropped(
    walk: &mut TreeWalk,
    before: &Mapping,
    after: &Mapping,
    mode: MappingDiffMode,
) -> TreeResult<Mapping> {
    let mut diff = before.empty_like();
    for (key, b) in before {
        match after.get(key) {
            None => {
                diff.insert(key.clone(), b.clone());
            }
            Some(a) => {
                let nested = walk.descend(key, |w| diff_node(w, b, a, Some(mode)))?;
                if let Some(node) = nested.filter(|d| !d.is_blank()) {
                    diff.insert(key.clone(), node);
                }
            }
        }
    }
    Ok(diff)
}
