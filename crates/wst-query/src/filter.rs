//! Empty-branch pruning.

use serde::{Deserialize, Serialize};
use tracing::debug;
use wst_types::{
    DiagnosticKind, Mapping, Node, Outcome, Scalar, Sequence, TreeResult, TreeWalk,
    DEFAULT_MAX_DEPTH,
};

/// Which scalars survive [`filter_empty`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarRetention {
    /// Keep every scalar, null and empty strings included.
    KeepAll,
    /// Drop null and the empty string.
    #[default]
    DropBlank,
}

impl ScalarRetention {
    fn keeps(self, scalar: &Scalar) -> bool {
        match self {
            Self::KeepAll => true,
            Self::DropBlank => !scalar.is_blank(),
        }
    }
}

/// Options for [`filter_empty`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterOptions {
    /// Top-level keys to keep, in output order. `None` keeps every key.
    pub allowed_keys: Option<Vec<String>>,
    pub scalar_retention: ScalarRetention,
    pub max_depth: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            allowed_keys: None,
            scalar_retention: ScalarRetention::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Copy of `tree` without empty mappings, empty sequences, and (depending on
/// [`ScalarRetention`]) blank scalars.
///
/// Pruning is bottom-up through mappings, so a mapping whose entries are all
/// pruned is itself dropped. Sequences are kept as they are, apart from blank
/// scalar elements under [`ScalarRetention::DropBlank`]; a sequence left
/// empty is dropped. Allowlisted keys absent from the tree are reported as
/// [`DiagnosticKind::MissingKey`] and omitted.
pub fn filter_empty(tree: &Mapping, options: &FilterOptions) -> TreeResult<Outcome<Mapping>> {
    let mut walk = TreeWalk::new("filter_empty", options.max_depth);
    let retention = options.scalar_retention;
    let mut kept = tree.empty_like();

    match &options.allowed_keys {
        Some(keys) => {
            for key in keys {
                match tree.get(key) {
                    Some(value) => {
                        if let Some(value) = walk.descend(key, |w| filter_node(w, value, retention))? {
                            kept.insert(key.clone(), value);
                        }
                    }
                    None => walk.descend(key, |w| {
                        w.report(DiagnosticKind::MissingKey);
                        Ok(())
                    })?,
                }
            }
        }
        None => kept = filter_map(&mut walk, tree, retention)?,
    }

    debug!(before = tree.len(), after = kept.len(), "filtered empty branches");
    Ok(walk.finish(kept))
}

fn filter_map(walk: &mut TreeWalk, tree: &Mapping, retention: ScalarRetention) -> TreeResult<Mapping> {
    let mut kept = tree.empty_like();
    for (key, value) in tree {
        if let Some(value) = walk.descend(key, |w| filter_node(w, value, retention))? {
            kept.insert(key.clone(), value);
        }
    }
    Ok(kept)
}

fn filter_node(walk: &mut TreeWalk, node: &Node, retention: ScalarRetention) -> TreeResult<Option<Node>> {
    let filtered = match node {
        Node::Map(inner) => Node::Map(filter_map(walk, inner, retention)?),
        // Sequence elements are not walked; only blank scalars are removed.
        Node::Seq(seq) => Node::Seq(Sequence::with_kind(
            seq.kind(),
            seq.iter()
                .filter(|item| match item {
                    Node::Scalar(scalar) => retention.keeps(scalar),
                    _ => true,
                })
                .cloned()
                .collect(),
        )),
        Node::Scalar(scalar) => return Ok(retention.keeps(scalar).then(|| node.clone())),
    };
    Ok((!filtered.is_blank()).then_some(filtered))
}
