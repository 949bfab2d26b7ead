use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::Node;

/// Sub-kind of a sequence container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeqKind {
    /// Ordered, duplicates allowed.
    List,
    /// Ordered, duplicates allowed, conventionally immutable.
    Tuple,
    /// Unordered, no duplicates.
    Set,
}

impl fmt::Display for SeqKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Tuple => write!(f, "tuple"),
            Self::Set => write!(f, "set"),
        }
    }
}

/// A sequence container carrying its own sub-kind.
///
/// `Set` sequences are kept sorted and deduplicated, so two sets with the
/// same members are structurally equal regardless of how they were built.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "SequenceRepr")]
pub struct Sequence {
    kind: SeqKind,
    items: Vec<Node>,
}

#[derive(Deserialize)]
struct SequenceRepr {
    kind: SeqKind,
    items: Vec<Node>,
}

impl From<SequenceRepr> for Sequence {
    fn from(repr: SequenceRepr) -> Self {
        Self::with_kind(repr.kind, repr.items)
    }
}

impl Sequence {
    /// Build a sequence of the given kind. Set kinds are normalized.
    pub fn with_kind(kind: SeqKind, items: Vec<Node>) -> Self {
        match kind {
            SeqKind::Set => {
                let unique: BTreeSet<Node> = items.into_iter().collect();
                Self::from_set(SeqKind::Set, unique)
            }
            _ => Self { kind, items },
        }
    }

    pub fn list(items: Vec<Node>) -> Self {
        Self::with_kind(SeqKind::List, items)
    }

    pub fn tuple(items: Vec<Node>) -> Self {
        Self::with_kind(SeqKind::Tuple, items)
    }

    pub fn set(items: Vec<Node>) -> Self {
        Self::with_kind(SeqKind::Set, items)
    }

    /// Build a sequence from an already-deduplicated set, in set order.
    pub fn from_set(kind: SeqKind, set: BTreeSet<Node>) -> Self {
        Self {
            kind,
            items: set.into_iter().collect(),
        }
    }

    pub fn kind(&self) -> SeqKind {
        self.kind
    }

    pub fn items(&self) -> &[Node] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Node> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Membership by structural equality.
    pub fn contains(&self, node: &Node) -> bool {
        self.items.contains(node)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.items.iter()
    }

    /// Re-cast to another sub-kind, deduplicating when the target is a set.
    pub fn recast(self, kind: SeqKind) -> Self {
        if self.kind == kind {
            return self;
        }
        Self::with_kind(kind, self.items)
    }

    /// Whether every element may be placed in a set.
    ///
    /// Scalars qualify, and so do tuples whose own elements qualify. Lists,
    /// sets, and mappings do not.
    pub fn is_hashable(&self) -> bool {
        self.items.iter().all(Node::is_hashable)
    }

    /// Coerce to a set, or `None` if an element is not hashable.
    pub fn to_set(&self) -> Option<BTreeSet<Node>> {
        if !self.is_hashable() {
            return None;
        }
        Some(self.items.iter().cloned().collect())
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for Sequence {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
