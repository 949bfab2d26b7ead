//! Structural subtraction, A − B.
//!
//! Lists and tuples subtract as multisets: each occurrence in B removes at
//! most one matching occurrence from A. Sets, and sequences of differing
//! sub-kinds, subtract as sets. Equal scalars vanish from the result.

use tracing::debug;
use wst_types::{
    Mapping, Node, Outcome, Pairing, SeqKind, Sequence, TreeResult, TreeWalk, DEFAULT_MAX_DEPTH,
};

/// Options for [`subtract`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubtractOptions {
    /// Keep A's value when B has no entry for the key.
    pub allow_missing: bool,
    /// Restrict the top level to these keys. `None` allows every key.
    pub allowed_keys: Option<Vec<String>>,
    pub max_depth: usize,
}

impl Default for SubtractOptions {
    fn default() -> Self {
        Self {
            allow_missing: true,
            allowed_keys: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Compute `a − b`. Neither input is modified.
pub fn subtract(a: &Mapping, b: &Mapping, options: &SubtractOptions) -> TreeResult<Outcome<Mapping>> {
    let mut walk = TreeWalk::new("subtract", options.max_depth);
    let result = subtract_maps(
        &mut walk,
        a,
        b,
        options.allow_missing,
        options.allowed_keys.as_deref(),
    )?;
    debug!(
        keys = result.len(),
        diagnostics = walk.diagnostics().len(),
        "subtracted trees"
    );
    Ok(walk.finish(result))
}

fn subtract_maps(
    walk: &mut TreeWalk,
    a: &Mapping,
    b: &Mapping,
    allow_missing: bool,
    allowed: Option<&[String]>,
) -> TreeResult<Mapping> {
    let mut result = a.empty_like();
    for (key, a_value) in a {
        if allowed.is_some_and(|keys| !keys.contains(key)) {
            continue;
        }
        match b.get(key) {
            None if allow_missing => {
                result.insert(key.clone(), a_value.clone());
            }
            None => {}
            Some(b_value) => {
                let value = walk.descend(key, |w| subtract_node(w, a_value, b_value))?;
                if let Some(value) = value {
                    result.insert(key.clone(), value);
                }
            }
        }
    }
    Ok(result)
}

/// Below the top level a key missing from B always keeps A's value.
fn subtract_node(walk: &mut TreeWalk, a: &Node, b: &Node) -> TreeResult<Option<Node>> {
    match a.pair(b) {
        Pairing::Maps(a, b) => Ok(Some(Node::Map(subtract_maps(walk, a, b, true, None)?))),
        Pairing::Seqs(a, b) => Ok(subtract_seqs(walk, a, b).map(Node::Seq)),
        Pairing::Scalars(x, y) => Ok((x != y).then(|| a.clone())),
        Pairing::Mismatch(left, right) => {
            walk.mismatch(left, right);
            Ok(None)
        }
    }
}

fn subtract_seqs(walk: &mut TreeWalk, a: &Sequence, b: &Sequence) -> Option<Sequence> {
    if a.kind() == b.kind() && a.kind() != SeqKind::Set {
        let mut remaining = a.items().to_vec();
        for item in b {
            if let Some(pos) = remaining.iter().position(|r| r == item) {
                remaining.remove(pos);
            }
        }
        return Some(Sequence::with_kind(a.kind(), remaining));
    }

    let Some(left) = a.to_set() else {
        walk.unhashable(a.kind().into());
        return None;
    };
    let Some(right) = b.to_set() else {
        walk.unhashable(b.kind().into());
        return None;
    };
    Some(Sequence::from_set(
        SeqKind::Set,
        left.difference(&right).cloned().collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wst_types::{DiagnosticKind, NodeKind};

    fn map<const N: usize>(entries: [(&str, Node); N]) -> Mapping {
        entries.into_iter().collect()
    }

    fn list(items: &[i64]) -> Node {
        Node::Seq(Sequence::list(items.iter().map(|i| Node::from(*i)).collect()))
    }

    fn tuple(items: &[i64]) -> Node {
        Node::Seq(Sequence::tuple(items.iter().map(|i| Node::from(*i)).collect()))
    }

    fn set(items: &[i64]) -> Node {
        Node::Seq(Sequence::set(items.iter().map(|i| Node::from(*i)).collect()))
    }

    fn sub(a: &Mapping, b: &Mapping) -> Outcome<Mapping> {
        subtract(a, b, &SubtractOptions::default()).unwrap()
    }

    #[test]
    fn multiset_subtraction_keeps_surplus_duplicates() {
        let a = map([("a", map([("p", list(&[1, 1, 2]))]).into())]);
        let b = map([("a", map([("p", list(&[1]))]).into())]);
        assert_eq!(sub(&a, &b).value, map([("a", map([("p", list(&[1, 2]))]).into())]));
    }

    #[test]
    fn b_occurrences_remove_at_most_one_each() {
        let a = map([("p", list(&[3, 1, 3, 3]))]);
        let b = map([("p", list(&[3, 3, 5]))]);
        assert_eq!(sub(&a, &b).value, map([("p", list(&[1, 3]))]));
    }

    #[test]
    fn tuples_stay_tuples() {
        let a = map([("p", tuple(&[1, 2, 2]))]);
        let b = map([("p", tuple(&[2]))]);
        assert_eq!(sub(&a, &b).value, map([("p", tuple(&[1, 2]))]));
    }

    #[test]
    fn sets_use_set_difference() {
        let a = map([("p", set(&[1, 2, 3]))]);
        let b = map([("p", set(&[2]))]);
        assert_eq!(sub(&a, &b).value, map([("p", set(&[1, 3]))]));
    }

    #[test]
    fn mixed_sequence_kinds_coerce_to_sets() {
        let a = map([("p", list(&[1, 1, 2]))]);
        let b = map([("p", set(&[1]))]);
        assert_eq!(sub(&a, &b).value, map([("p", set(&[2]))]));
    }

    #[test]
    fn equal_scalars_vanish() {
        let a = map([("same", 1.into()), ("diff", 2.into())]);
        let b = map([("same", 1.into()), ("diff", 3.into())]);
        assert_eq!(sub(&a, &b).value, map([("diff", 2.into())]));
    }

    #[test]
    fn missing_keys_follow_allow_missing() {
        let a = map([("only_a", 1.into())]);
        let b = map([]);
        assert_eq!(sub(&a, &b).value, a);

        let strict = SubtractOptions {
            allow_missing: false,
            ..Default::default()
        };
        assert!(subtract(&a, &b, &strict).unwrap().value.is_empty());
    }

    #[test]
    fn strict_missing_keys_apply_at_top_level_only() {
        let a = map([("o", map([("p", 1.into())]).into()), ("gone", 2.into())]);
        let b = map([("o", Mapping::new().into())]);
        let strict = SubtractOptions {
            allow_missing: false,
            ..Default::default()
        };
        let out = subtract(&a, &b, &strict).unwrap();
        assert_eq!(out.value, map([("o", map([("p", 1.into())]).into())]));
    }

    #[test]
    fn allowlist_applies_at_top_level_only() {
        let a = map([
            ("x", map([("p", 1.into()), ("q", 2.into())]).into()),
            ("y", 5.into()),
        ]);
        let b = map([("x", map([("p", 9.into())]).into())]);
        let options = SubtractOptions {
            allowed_keys: Some(vec!["x".into()]),
            ..Default::default()
        };
        let out = subtract(&a, &b, &options).unwrap();
        assert_eq!(out.value, map([("x", map([("p", 1.into()), ("q", 2.into())]).into())]));
    }

    #[test]
    fn unresolvable_mismatch_is_dropped_with_diagnostic() {
        let a = map([("p", list(&[1])), ("q", 1.into())]);
        let b = map([("p", map([("x", 1.into())]).into()), ("q", 2.into())]);
        let out = sub(&a, &b);
        assert_eq!(out.value, map([("q", 1.into())]));
        assert_eq!(
            out.diagnostics[0].kind,
            DiagnosticKind::TypeMismatch {
                left: NodeKind::List,
                right: NodeKind::Mapping,
            }
        );
    }

    #[test]
    fn fully_subtracted_mapping_stays_as_empty() {
        let a = map([("o", map([("p", 1.into())]).into())]);
        let out = sub(&a, &a);
        assert_eq!(out.value, map([("o", Mapping::new().into())]));
    }

    #[test]
    fn unhashable_set_coercion_is_reported() {
        let nested = Node::Seq(Sequence::list(vec![list(&[1])]));
        let a = map([("p", nested)]);
        let b = map([("p", set(&[1]))]);
        let out = sub(&a, &b);
        assert!(out.value.is_empty());
        assert_eq!(
            out.diagnostics[0].kind,
            DiagnosticKind::Unhashable { kind: NodeKind::List }
        );
    }

    #[test]
    fn inputs_are_untouched() {
        let a = map([("p", list(&[1, 2]))]);
        let b = map([("p", list(&[1]))]);
        let a_before = a.clone();
        let _ = sub(&a, &b);
        assert_eq!(a, a_before);
    }
}
