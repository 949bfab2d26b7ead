//! The unchanged subset shared by two state trees.

use tracing::debug;
use wst_types::{
    Mapping, Node, Outcome, Pairing, SeqKind, Sequence, TreeResult, TreeWalk, DEFAULT_MAX_DEPTH,
};

/// Options for [`intersect`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntersectOptions {
    /// Treat a key missing from the compare tree as unchanged and keep the
    /// source value.
    pub allow_missing: bool,
    /// Restrict the top level to these keys. `None` allows every key.
    pub allowed_keys: Option<Vec<String>>,
    pub max_depth: usize,
}

impl Default for IntersectOptions {
    fn default() -> Self {
        Self {
            allow_missing: false,
            allowed_keys: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Entries of `source` that `compare` agrees with.
///
/// Sequences intersect as sets and keep their sub-kind only when both sides
/// share it. Scalars survive only when equal. The result is a fresh tree
/// sharing nothing with either input.
pub fn intersect(
    source: &Mapping,
    compare: &Mapping,
    options: &IntersectOptions,
) -> TreeResult<Outcome<Mapping>> {
    let mut walk = TreeWalk::new("intersect", options.max_depth);
    let common = intersect_maps(
        &mut walk,
        source,
        compare,
        options.allow_missing,
        options.allowed_keys.as_deref(),
    )?;
    debug!(
        keys = common.len(),
        diagnostics = walk.diagnostics().len(),
        "intersected trees"
    );
    Ok(walk.finish(common))
}

fn intersect_maps(
    walk: &mut TreeWalk,
    source: &Mapping,
    compare: &Mapping,
    allow_missing: bool,
    allowed: Option<&[String]>,
) -> TreeResult<Mapping> {
    let mut common = source.empty_like();
    for (key, source_value) in source {
        if allowed.is_some_and(|keys| !keys.contains(key)) {
            continue;
        }
        match compare.get(key) {
            None if allow_missing => {
                common.insert(key.clone(), source_value.clone());
            }
            None => {}
            Some(compare_value) => {
                let value = walk.descend(key, |w| {
                    intersect_node(w, source_value, compare_value, allow_missing)
                })?;
                if let Some(value) = value {
                    common.insert(key.clone(), value);
                }
            }
        }
    }
    Ok(common)
}

fn intersect_node(
    walk: &mut TreeWalk,
    source: &Node,
    compare: &Node,
    allow_missing: bool,
) -> TreeResult<Option<Node>> {
    match source.pair(compare) {
        Pairing::Maps(a, b) => Ok(Some(Node::Map(intersect_maps(walk, a, b, allow_missing, None)?))),
        Pairing::Seqs(a, b) => {
            let Some(left) = a.to_set() else {
                walk.unhashable(a.kind().into());
                return Ok(None);
            };
            let Some(right) = b.to_set() else {
                walk.unhashable(b.kind().into());
                return Ok(None);
            };
            let kind = if a.kind() == b.kind() { a.kind() } else { SeqKind::Set };
            let shared = left.intersection(&right).cloned().collect();
            Ok(Some(Node::Seq(Sequence::from_set(kind, shared))))
        }
        Pairing::Scalars(x, y) => Ok((x == y).then(|| source.clone())),
        Pairing::Mismatch(left, right) => {
            walk.mismatch(left, right);
            Ok(None)
        }
    }
}
