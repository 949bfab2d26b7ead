//! Human-readable renderings of a tree.
//!
//! Read-only helpers for logging and inspection. None of the algebra calls
//! into this module.

use tracing::info;

use crate::mapping::Mapping;
use crate::node::Node;

/// Entries in display order: unordered mappings sorted by key, ordered
/// mappings in insertion order.
fn display_entries(mapping: &Mapping) -> Vec<(&String, &Node)> {
    let mut entries: Vec<_> = mapping.iter().collect();
    if !mapping.is_ordered() {
        entries.sort_by(|a, b| a.0.cmp(b.0));
    }
    entries
}

/// One line per leaf, each the `spacer`-joined path from the root.
///
/// Sequence elements are leaves. Empty containers produce no lines.
pub fn layered_lines(node: &Node, spacer: &str) -> Vec<String> {
    match node {
        Node::Map(m) => display_entries(m)
            .into_iter()
            .flat_map(|(key, value)| {
                layered_lines(value, spacer)
                    .into_iter()
                    .map(move |rest| format!("{key}{spacer}{rest}"))
            })
            .collect(),
        Node::Seq(s) => s.iter().map(ToString::to_string).collect(),
        Node::Scalar(s) => vec![s.to_string()],
    }
}

/// One line per key and per leaf, indented by `indent`, which doubles at
/// every nested mapping level.
pub fn indented_lines(node: &Node, indent: &str) -> Vec<String> {
    let mut lines = Vec::new();
    push_indented(node, indent, &mut lines);
    lines
}

fn push_indented(node: &Node, indent: &str, lines: &mut Vec<String>) {
    match node {
        Node::Map(m) => {
            let deeper = indent.repeat(2);
            for (key, value) in m {
                lines.push(format!("{indent}{key}"));
                push_indented(value, &deeper, lines);
            }
        }
        Node::Seq(s) => lines.extend(s.iter().map(|item| format!("{indent}{item}"))),
        Node::Scalar(s) => lines.push(format!("{indent}{s}")),
    }
}

/// One line per leaf, prefixed by `precursor` and the chain of keys that
/// leads to it, each separated by `spacer`.
pub fn compact_lines(node: &Node, spacer: &str, precursor: &str) -> Vec<String> {
    match node {
        Node::Map(m) => m
            .iter()
            .flat_map(|(key, value)| compact_lines(value, spacer, &format!("{precursor}{spacer}{key}")))
            .collect(),
        Node::Seq(s) => s.iter().map(|item| format!("{precursor}{spacer}{item}")).collect(),
        Node::Scalar(s) => vec![format!("{precursor}{spacer}{s}")],
    }
}

/// Emit [`indented_lines`] as `info!` events.
pub fn log_tree(node: &Node, indent: &str) {
    for line in indented_lines(node, indent) {
        info!(target: "wst::tree", "{line}");
    }
}

/// Render a state as one string: sorted keys, each followed by its value
/// padded with single spaces. Nested mappings render recursively.
pub fn single_line(state: &Mapping) -> String {
    let mut keys: Vec<&String> = state.keys().collect();
    keys.sort();
    let mut out = String::new();
    for key in keys {
        out.push_str(key);
        let rendered = match state.get(key) {
            Some(Node::Map(inner)) => single_line(inner),
            Some(other) => other.to_string(),
            None => continue,
        };
        out.push(' ');
        out.push_str(&rendered);
        out.push(' ');
    }
    out
}
