//! Helpers for flat (non-mapping) structures.

use std::collections::BTreeSet;

use crate::node::Node;
use crate::sequence::{SeqKind, Sequence};

/// All leaves of arbitrarily nested sequences, in order. Mappings and
/// scalars are leaves.
pub fn flatten(node: &Node) -> Vec<Node> {
    let mut out = Vec::new();
    push_flat(node, &mut out);
    out
}

fn push_flat(node: &Node, out: &mut Vec<Node>) {
    match node {
        Node::Seq(s) => s.iter().for_each(|item| push_flat(item, out)),
        leaf => out.push(leaf.clone()),
    }
}

/// Common elements of two flat values, either of which may be a single
/// scalar rather than a sequence. The result has no duplicates.
pub fn flat_intersection(a: &Node, b: &Node) -> Vec<Node> {
    match (a, b) {
        (Node::Seq(a), Node::Seq(b)) => {
            let common: BTreeSet<&Node> = a.iter().filter(|item| b.contains(item)).collect();
            common.into_iter().cloned().collect()
        }
        (Node::Seq(seq), single) | (single, Node::Seq(seq)) => {
            if seq.contains(single) {
                vec![single.clone()]
            } else {
                Vec::new()
            }
        }
        (a, b) if a == b => vec![a.clone()],
        _ => Vec::new(),
    }
}

/// Convert every list, including lists nested inside sequences, into a
/// tuple. Mappings and scalars are returned unchanged.
pub fn lists_to_tuples(node: &Node) -> Node {
    match node {
        Node::Seq(s) if s.kind() == SeqKind::List => {
            Node::Seq(Sequence::tuple(s.iter().map(lists_to_tuples).collect()))
        }
        Node::Seq(s) => Node::Seq(Sequence::with_kind(
            s.kind(),
            s.iter().map(lists_to_tuples).collect(),
        )),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: Vec<Node>) -> Node {
        Node::Seq(Sequence::list(items))
    }

    #[test]
    fn flatten_nested_lists() {
        let nested = list(vec![1.into(), list(vec![2.into(), list(vec![3.into()])]), 4.into()]);
        assert_eq!(
            flatten(&nested),
            vec![Node::from(1), Node::from(2), Node::from(3), Node::from(4)]
        );
    }

    #[test]
    fn flatten_scalar_is_itself() {
        assert_eq!(flatten(&Node::from("x")), vec![Node::from("x")]);
    }

    #[test]
    fn intersection_of_sequences() {
        let a = list(vec![1.into(), 2.into(), 2.into(), 3.into()]);
        let b = Node::Seq(Sequence::tuple(vec![2.into(), 3.into(), 4.into()]));
        assert_eq!(flat_intersection(&a, &b), vec![Node::from(2), Node::from(3)]);
    }

    #[test]
    fn intersection_with_single_values() {
        let a = list(vec![1.into(), 2.into()]);
        assert_eq!(flat_intersection(&a, &Node::from(2)), vec![Node::from(2)]);
        assert_eq!(flat_intersection(&Node::from(5), &a), Vec::<Node>::new());
        assert_eq!(flat_intersection(&Node::from(5), &Node::from(5)), vec![Node::from(5)]);
        assert!(flat_intersection(&Node::from(5), &Node::from(6)).is_empty());
    }

    #[test]
    fn lists_become_tuples_recursively() {
        let nested = list(vec![1.into(), list(vec![2.into()])]);
        let converted = lists_to_tuples(&nested);
        let outer = converted.as_sequence().unwrap();
        assert_eq!(outer.kind(), SeqKind::Tuple);
        assert_eq!(outer.items()[1].as_sequence().unwrap().kind(), SeqKind::Tuple);
    }
}
