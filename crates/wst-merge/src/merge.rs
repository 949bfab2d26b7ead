//! Conflict-aware union of two state trees.
//!
//! The merge works on an owned copy of the main tree. New keys are copied
//! in wholesale and shared keys are reconciled by kind. A container-kind
//! mismatch anywhere cancels the whole merge: the original main tree is
//! returned unchanged with the conflict flag set.

use std::collections::BTreeSet;

use tracing::{debug, warn};
use wst_types::{
    Diagnostic, Mapping, Node, SeqKind, Sequence, TreeResult, TreeWalk, DEFAULT_MAX_DEPTH,
};

/// Options for [`merge`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOptions {
    /// Overwrite differing scalars with the new value. When `false`, the
    /// main value is kept and the merge is flagged as conflicted.
    pub update_conflicts: bool,
    /// Union shared sequences.
    pub lists_add: bool,
    /// When not adding, replace shared sequences with the new value.
    /// When neither adding nor replacing, shared sequences are intersected.
    pub list_replace: bool,
    pub max_depth: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            update_conflicts: true,
            lists_add: true,
            list_replace: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Result of a merge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The merged tree, or the original main tree if the merge aborted.
    pub tree: Mapping,
    /// A scalar conflict was kept unresolved, or the merge aborted.
    pub has_conflicts: bool,
    /// The merge hit a container-kind mismatch and was rolled back.
    pub aborted: bool,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Merged { conflicts: bool },
    Abort,
}

/// Merge `new_values` into a copy of `main`.
pub fn merge(main: &Mapping, new_values: &Mapping, options: &MergeOptions) -> TreeResult<MergeOutcome> {
    let mut walk = TreeWalk::new("merge", options.max_depth);
    let mut merged = main.clone();
    let step = merge_maps(&mut walk, &mut merged, new_values, options)?;
    let outcome = match step {
        Step::Merged { conflicts } => {
            debug!(keys = merged.len(), conflicts, "merged trees");
            MergeOutcome {
                tree: merged,
                has_conflicts: conflicts,
                aborted: false,
                diagnostics: walk.diagnostics().to_vec(),
            }
        }
        Step::Abort => {
            warn!("container kinds do not match, merge rolled back");
            MergeOutcome {
                tree: main.clone(),
                has_conflicts: true,
                aborted: true,
                diagnostics: walk.diagnostics().to_vec(),
            }
        }
    };
    Ok(outcome)
}

fn merge_maps(
    walk: &mut TreeWalk,
    main: &mut Mapping,
    incoming: &Mapping,
    options: &MergeOptions,
) -> TreeResult<Step> {
    let mut conflicts = false;
    for (key, new_value) in incoming {
        match main.get_mut(key) {
            None => {
                main.insert(key.clone(), new_value.clone());
            }
            Some(current) => {
                match walk.descend(key, |w| merge_value(w, current, new_value, options))? {
                    Step::Abort => return Ok(Step::Abort),
                    Step::Merged { conflicts: nested } => conflicts |= nested,
                }
            }
        }
    }
    Ok(Step::Merged { conflicts })
}

fn merge_value(
    walk: &mut TreeWalk,
    current: &mut Node,
    incoming: &Node,
    options: &MergeOptions,
) -> TreeResult<Step> {
    match (&mut *current, incoming) {
        (Node::Map(main), Node::Map(new)) if main.is_ordered() == new.is_ordered() => {
            // Nested sequences are never replaced, only added or intersected.
            let nested = MergeOptions {
                list_replace: false,
                ..options.clone()
            };
            merge_maps(walk, main, new, &nested)
        }
        (Node::Seq(main), Node::Seq(new)) => {
            if let Some(merged) = merge_seqs(walk, main, new, options) {
                *main = merged;
            }
            Ok(Step::Merged { conflicts: false })
        }
        (Node::Scalar(main), Node::Scalar(new)) => {
            if options.update_conflicts {
                *main = new.clone();
                Ok(Step::Merged { conflicts: false })
            } else {
                Ok(Step::Merged {
                    conflicts: main != new,
                })
            }
        }
        (main, new) => {
            walk.mismatch(main.kind(), new.kind());
            Ok(Step::Abort)
        }
    }
}

/// Kind of a combined sequence: shared kind, or a set when the kinds differ.
fn combined_kind(a: &Sequence, b: &Sequence) -> SeqKind {
    if a.kind() == b.kind() {
        a.kind()
    } else {
        SeqKind::Set
    }
}

/// Returns `None` to leave the main sequence as it is.
fn merge_seqs(
    walk: &mut TreeWalk,
    main: &Sequence,
    new: &Sequence,
    options: &MergeOptions,
) -> Option<Sequence> {
    let kind = combined_kind(main, new);
    if options.lists_add {
        return Some(match (main.to_set(), new.to_set()) {
            (Some(a), Some(b)) => Sequence::from_set(kind, a.union(&b).cloned().collect()),
            // Elements that cannot form a set are concatenated instead.
            _ => {
                let mut items = main.items().to_vec();
                items.extend(new.iter().cloned());
                Sequence::with_kind(main.kind(), items)
            }
        });
    }
    if options.list_replace {
        return Some(new.clone());
    }
    match (main.to_set(), new.to_set()) {
        (Some(a), Some(b)) => {
            let common: BTreeSet<Node> = a.intersection(&b).cloned().collect();
            Some(Sequence::from_set(kind, common))
        }
        (None, _) => {
            walk.unhashable(main.kind().into());
            None
        }
        (_, None) => {
            walk.unhashable(new.kind().into());
            None
        }
    }
}
