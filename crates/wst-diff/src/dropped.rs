//! Detection of elements lost between a "from" tree and a "result" tree.
//!
//! Unlike subtraction, sequences compare by plain set difference and the
//! container kinds must match exactly.

use tracing::debug;
use wst_types::{Mapping, Node, Outcome, Sequence, TreeResult, TreeWalk, DEFAULT_MAX_DEPTH};

/// Options for [`dropped`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedOptions {
    /// Also report scalars whose value changed.
    pub check_single_values: bool,
    pub max_depth: usize,
}

impl Default for DroppedOptions {
    fn default() -> Self {
        Self {
            check_single_values: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Report what `from` holds that `result` no longer does.
///
/// Keys absent from `result` are skipped silently; keys whose kinds differ
/// are skipped with a diagnostic.
pub fn dropped(from: &Mapping, result: &Mapping, options: &DroppedOptions) -> TreeResult<Outcome<Mapping>> {
    let mut walk = TreeWalk::new("dropped", options.max_depth);
    let lost = dropped_maps(&mut walk, from, result, options.check_single_values)?;
    debug!(keys = lost.len(), "collected dropped entries");
    Ok(walk.finish(lost))
}

fn dropped_maps(
    walk: &mut TreeWalk,
    from: &Mapping,
    result: &Mapping,
    check_single_values: bool,
) -> TreeResult<Mapping> {
    let mut lost = from.empty_like();
    for (key, before) in from {
        let Some(after) = result.get(key) else {
            continue;
        };
        let entry = walk.descend(key, |w| dropped_node(w, before, after, check_single_values))?;
        if let Some(entry) = entry {
            lost.insert(key.clone(), entry);
        }
    }
    Ok(lost)
}

fn dropped_node(
    walk: &mut TreeWalk,
    before: &Node,
    after: &Node,
    check_single_values: bool,
) -> TreeResult<Option<Node>> {
    if before.kind() != after.kind() {
        walk.mismatch(before.kind(), after.kind());
        return Ok(None);
    }
    match (before, after) {
        (Node::Map(b), Node::Map(a)) => Ok(Some(Node::Map(dropped_maps(walk, b, a, check_single_values)?))),
        (Node::Seq(b), Node::Seq(a)) => {
            let (Some(left), Some(right)) = (b.to_set(), a.to_set()) else {
                walk.unhashable(before.kind());
                return Ok(None);
            };
            let lost = left.difference(&right).cloned().collect();
            Ok(Some(Node::Seq(Sequence::from_set(b.kind(), lost))))
        }
        _ if check_single_values && before != after => Ok(Some(before.clone())),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wst_types::{DiagnosticKind, NodeKind, SeqKind};

    fn map<const N: usize>(entries: [(&str, Node); N]) -> Mapping {
        entries.into_iter().collect()
    }

    fn seq(kind: SeqKind, items: &[&str]) -> Node {
        Node::Seq(Sequence::with_kind(kind, items.iter().map(|s| Node::from(*s)).collect()))
    }

    fn run(from: &Mapping, result: &Mapping) -> Outcome<Mapping> {
        dropped(from, result, &DroppedOptions::default()).unwrap()
    }

    #[test]
    fn reports_lost_set_members() {
        let from = map([("o", map([("colour", seq(SeqKind::Set, &["red", "blue"]))]).into())]);
        let result = map([("o", map([("colour", seq(SeqKind::Set, &["blue"]))]).into())]);
        assert_eq!(
            run(&from, &result).value,
            map([("o", map([("colour", seq(SeqKind::Set, &["red"]))]).into())])
        );
    }

    #[test]
    fn list_difference_ignores_multiplicity() {
        let from = map([("p", seq(SeqKind::List, &["a", "a", "b"]))]);
        let result = map([("p", seq(SeqKind::List, &["a"]))]);
        assert_eq!(run(&from, &result).value, map([("p", seq(SeqKind::List, &["b"]))]));
    }

    #[test]
    fn tuples_stay_tuples() {
        let from = map([("p", seq(SeqKind::Tuple, &["a", "b"]))]);
        let result = map([("p", seq(SeqKind::Tuple, &["b"]))]);
        let out = run(&from, &result).value;
        assert_eq!(out.get("p").unwrap().kind(), NodeKind::Tuple);
    }

    #[test]
    fn nothing_lost_gives_empty_sequence() {
        let from = map([("p", seq(SeqKind::Set, &["a"]))]);
        let out = run(&from, &from).value;
        assert_eq!(out, map([("p", seq(SeqKind::Set, &[]))]));
    }

    #[test]
    fn missing_keys_skipped_silently() {
        let from = map([("gone", seq(SeqKind::Set, &["a"]))]);
        let out = run(&from, &map([]));
        assert!(out.value.is_empty());
        assert!(out.is_clean());
    }

    #[test]
    fn kind_mismatch_skipped_with_diagnostic() {
        let from = map([("p", seq(SeqKind::List, &["a"]))]);
        let result = map([("p", seq(SeqKind::Set, &["a"]))]);
        let out = run(&from, &result);
        assert!(out.value.is_empty());
        assert_eq!(
            out.diagnostics[0].kind,
            DiagnosticKind::TypeMismatch {
                left: NodeKind::List,
                right: NodeKind::Set,
            }
        );
    }

    #[test]
    fn scalars_reported_only_when_checked() {
        let from = map([("p", "old".into()), ("q", "same".into())]);
        let result = map([("p", "new".into()), ("q", "same".into())]);
        assert!(run(&from, &result).value.is_empty());

        let options = DroppedOptions {
            check_single_values: true,
            ..Default::default()
        };
        let out = dropped(&from, &result, &options).unwrap();
        assert_eq!(out.value, map([("p", "old".into())]));
    }
}
