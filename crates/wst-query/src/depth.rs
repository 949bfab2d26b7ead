//! Collect keys or values at a fixed nesting depth.
//!
//! Depth 1 is the top level of the tree. Results keep duplicates and follow
//! key iteration order. A depth that does not match the tree's nesting
//! yields a partial or empty result rather than an error.

use wst_types::{Mapping, Node, TreeResult, TreeWalk, DEFAULT_MAX_DEPTH};

/// Keys found at `depth`.
///
/// At depth 2, sequence values contribute their elements and scalar values
/// contribute themselves, so the leaves of an `object → property → values`
/// state can be read as its third level.
pub fn keys_at_depth(tree: &Mapping, depth: usize) -> TreeResult<Vec<Node>> {
    let mut walk = TreeWalk::new("keys_at_depth", DEFAULT_MAX_DEPTH);
    let mut out = Vec::new();
    if depth > 0 {
        collect_keys(&mut walk, tree, depth, &mut out)?;
    }
    Ok(out)
}

fn collect_keys(walk: &mut TreeWalk, tree: &Mapping, depth: usize, out: &mut Vec<Node>) -> TreeResult<()> {
    if depth == 1 {
        out.extend(tree.keys().map(|k| Node::from(k.as_str())));
        return Ok(());
    }
    for (key, value) in tree {
        match value {
            Node::Map(inner) => walk.descend(key, |w| collect_keys(w, inner, depth - 1, out))?,
            Node::Seq(seq) if depth == 2 => out.extend(seq.iter().cloned()),
            Node::Scalar(_) if depth == 2 => out.push(value.clone()),
            _ => {}
        }
    }
    Ok(())
}

/// Values found at `depth`.
///
/// Depth 1 returns the whole tree as the single element. From depth 2 on,
/// the values held by the keys at that depth are returned as they are:
/// sequences are appended whole, not spliced.
pub fn values_at_depth(tree: &Mapping, depth: usize) -> TreeResult<Vec<Node>> {
    let mut walk = TreeWalk::new("values_at_depth", DEFAULT_MAX_DEPTH);
    let mut out = Vec::new();
    match depth {
        0 => {}
        1 => out.push(Node::Map(tree.clone())),
        _ => collect_values(&mut walk, tree, depth, &mut out)?,
    }
    Ok(out)
}

fn collect_values(walk: &mut TreeWalk, tree: &Mapping, depth: usize, out: &mut Vec<Node>) -> TreeResult<()> {
    for (key, value) in tree {
        match value {
            Node::Map(inner) if depth == 2 => out.extend(inner.values().cloned()),
            Node::Map(inner) => walk.descend(key, |w| collect_values(w, inner, depth - 1, out))?,
            other if depth == 2 => out.push(other.clone()),
            _ => {}
        }
    }
    Ok(())
}
