use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TreeError, TreeResult};
use crate::mapping::Mapping;
use crate::scalar::Scalar;
use crate::sequence::{SeqKind, Sequence};

/// A tagged world-state tree node.
///
/// Every recursive operation dispatches on this tag rather than probing
/// shapes at runtime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Node {
    Map(Mapping),
    Seq(Sequence),
    Scalar(Scalar),
}

/// The container kind of a node, used to detect mismatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Mapping,
    OrderedMapping,
    List,
    Tuple,
    Set,
    Scalar,
}

impl NodeKind {
    /// List, tuple, and set.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::List | Self::Tuple | Self::Set)
    }

    /// Two kinds are compatible when equal, or when both are sequences
    /// (which may be reconciled by coercing both to sets).
    pub fn is_compatible_with(&self, other: &NodeKind) -> bool {
        self == other || (self.is_sequence() && other.is_sequence())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mapping => "mapping",
            Self::OrderedMapping => "ordered mapping",
            Self::List => "list",
            Self::Tuple => "tuple",
            Self::Set => "set",
            Self::Scalar => "scalar",
        };
        write!(f, "{name}")
    }
}

impl From<SeqKind> for NodeKind {
    fn from(kind: SeqKind) -> Self {
        match kind {
            SeqKind::List => Self::List,
            SeqKind::Tuple => Self::Tuple,
            SeqKind::Set => Self::Set,
        }
    }
}

/// Two nodes found under the same key, classified for a binary operation.
#[derive(Debug)]
pub enum Pairing<'a> {
    /// Mappings of the same flavor.
    Maps(&'a Mapping, &'a Mapping),
    /// Sequences of any sub-kinds.
    Seqs(&'a Sequence, &'a Sequence),
    Scalars(&'a Scalar, &'a Scalar),
    /// Kinds that cannot be reconciled.
    Mismatch(NodeKind, NodeKind),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Map(m) => m.kind(),
            Self::Seq(s) => s.kind().into(),
            Self::Scalar(_) => NodeKind::Scalar,
        }
    }

    /// Classify `self` against `other` for a binary tree operation.
    pub fn pair<'a>(&'a self, other: &'a Node) -> Pairing<'a> {
        match (self, other) {
            (Self::Map(a), Self::Map(b)) if a.is_ordered() == b.is_ordered() => Pairing::Maps(a, b),
            (Self::Seq(a), Self::Seq(b)) => Pairing::Seqs(a, b),
            (Self::Scalar(a), Self::Scalar(b)) => Pairing::Scalars(a, b),
            _ => Pairing::Mismatch(self.kind(), other.kind()),
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Unwrap a top-level tree.
    pub fn into_mapping(self) -> TreeResult<Mapping> {
        match self {
            Self::Map(m) => Ok(m),
            other => Err(TreeError::NotAMapping { kind: other.kind() }),
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Seq(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this node may be an element of a set.
    pub fn is_hashable(&self) -> bool {
        match self {
            Self::Scalar(_) => true,
            Self::Seq(s) => s.kind() == SeqKind::Tuple && s.is_hashable(),
            Self::Map(_) => false,
        }
    }

    /// Empty containers, null, and the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Map(m) => m.is_empty(),
            Self::Seq(s) => s.is_empty(),
            Self::Scalar(s) => s.is_blank(),
        }
    }

    /// Import plain JSON: objects become unordered mappings, arrays become
    /// lists.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Scalar(Scalar::Int(i)),
                None => Self::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            Value::String(s) => Self::Scalar(Scalar::Str(s.clone())),
            Value::Array(items) => Self::Seq(Sequence::list(items.iter().map(Self::from_json).collect())),
            Value::Object(map) => Self::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Export to plain JSON. Sequence sub-kinds and mapping flavors are
    /// not representable and are dropped; non-finite floats become null.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Map(m) => Value::Object(m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()),
            Self::Seq(s) => Value::Array(s.iter().map(Node::to_json).collect()),
            Self::Scalar(s) => match s {
                Scalar::Null => Value::Null,
                Scalar::Bool(b) => Value::Bool(*b),
                Scalar::Int(i) => Value::from(*i),
                Scalar::Float(x) => serde_json::Number::from_f64(*x)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                Scalar::Str(s) => Value::String(s.clone()),
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Scalar(_) => 0,
            Self::Seq(_) => 1,
            Self::Map(_) => 2,
        }
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a.cmp(b),
            (Self::Seq(a), Self::Seq(b)) => a.cmp(b),
            (Self::Map(a), Self::Map(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{s}"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<Mapping> for Node {
    fn from(m: Mapping) -> Self {
        Self::Map(m)
    }
}

impl From<Sequence> for Node {
    fn from(s: Sequence) -> Self {
        Self::Seq(s)
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Scalar(s.into())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::Scalar(s.into())
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Self::Scalar(i.into())
    }
}

impl From<i32> for Node {
    fn from(i: i32) -> Self {
        Self::Scalar(i.into())
    }
}

impl From<f64> for Node {
    fn from(x: f64) -> Self {
        Self::Scalar(x.into())
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Self::Scalar(b.into())
    }
}
