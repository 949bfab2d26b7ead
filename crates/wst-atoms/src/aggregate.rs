use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wst_types::{Mapping, Node, Scalar, Sequence};

use crate::atom::Atom;
use crate::error::AtomResult;

/// How values for a repeated (object, property) pair combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregatePolicy {
    /// Each property holds a set; re-adding a value is a no-op.
    #[default]
    Set,
    /// Each property holds a list deduplicated after every insertion. The
    /// final order is value order, not insertion order.
    DedupList,
    /// Each property holds every value in insertion order, duplicates kept.
    List,
    /// Each property holds a single value; later atoms overwrite earlier ones.
    LastWrite,
}

#[derive(Debug)]
enum Slot {
    Set(BTreeSet<Node>),
    List(Vec<Node>),
    Single(Option<Node>),
}

impl Slot {
    fn empty(policy: AggregatePolicy) -> Self {
        match policy {
            AggregatePolicy::Set | AggregatePolicy::DedupList => Self::Set(BTreeSet::new()),
            AggregatePolicy::List => Self::List(Vec::new()),
            AggregatePolicy::LastWrite => Self::Single(None),
        }
    }

    fn add(&mut self, unit: Node) {
        match self {
            Self::Set(set) => {
                set.insert(unit);
            }
            Self::List(list) => list.push(unit),
            Self::Single(slot) => *slot = Some(unit),
        }
    }

    fn into_node(self, policy: AggregatePolicy) -> Option<Node> {
        match (self, policy) {
            (Self::Set(set), AggregatePolicy::DedupList) => {
                Some(Node::Seq(Sequence::list(set.into_iter().collect())))
            }
            (Self::Set(set), _) => Some(Node::Seq(Sequence::set(set.into_iter().collect()))),
            (Self::List(list), _) => Some(Node::Seq(Sequence::list(list))),
            (Self::Single(value), _) => value,
        }
    }
}

/// Incrementally folds atoms into a state tree.
///
/// Objects and properties appear in the output in first-seen order.
#[derive(Debug)]
pub struct StateBuilder {
    policy: AggregatePolicy,
    objects: IndexMap<String, IndexMap<String, Slot>>,
    atoms: usize,
}

impl StateBuilder {
    pub fn new(policy: AggregatePolicy) -> Self {
        Self {
            policy,
            objects: IndexMap::new(),
            atoms: 0,
        }
    }

    pub fn policy(&self) -> AggregatePolicy {
        self.policy
    }

    /// Number of atoms added so far.
    pub fn len(&self) -> usize {
        self.atoms
    }

    pub fn is_empty(&self) -> bool {
        self.atoms == 0
    }

    /// Add one parsed atom. Each unit of a sub-list value is added on its own.
    pub fn add(&mut self, atom: &Atom) {
        let policy = self.policy;
        let slot = self
            .objects
            .entry(atom.object.clone())
            .or_default()
            .entry(atom.property.clone())
            .or_insert_with(|| Slot::empty(policy));
        for unit in atom.value.units() {
            slot.add(Node::Scalar(Scalar::str(unit)));
        }
        self.atoms += 1;
    }

    /// Parse and add one encoded atom.
    pub fn add_encoded(&mut self, raw: &str, separator: &str) -> AtomResult<()> {
        let atom = Atom::parse(raw, separator)?;
        self.add(&atom);
        Ok(())
    }

    /// Produce the `object → property → values` tree.
    pub fn finish(self) -> Mapping {
        let policy = self.policy;
        let mut state = Mapping::new();
        for (object, properties) in self.objects {
            let mut props = Mapping::new();
            for (property, slot) in properties {
                if let Some(value) = slot.into_node(policy) {
                    props.insert(property, value);
                }
            }
            state.insert(object, props);
        }
        debug!(atoms = self.atoms, objects = state.len(), ?policy, "aggregated atoms");
        state
    }
}

/// Aggregate encoded atoms into a state tree in one pass.
///
/// Fails on the first malformed atom; nothing is silently skipped.
pub fn aggregate<I, S>(atoms: I, separator: &str, policy: AggregatePolicy) -> AtomResult<Mapping>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = StateBuilder::new(policy);
    for raw in atoms {
        builder.add_encoded(raw.as_ref(), separator)?;
    }
    Ok(builder.finish())
}
