use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A primitive leaf value.
///
/// Scalars are totally ordered so that they can be collected into ordered
/// sets: variants order as `Null < Bool < Int < Float < Str`, and floats
/// compare with [`f64::total_cmp`]. An `Int` never equals a `Float`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Convenience constructor for string scalars.
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// Returns `true` for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for `Null` and for the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Str(s) => s.is_empty(),
            _ => false,
        }
    }

    /// The string payload, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Float(_) => 3,
            Self::Str(_) => 4,
        }
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scalar {}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_ranks_variants() {
        assert!(Scalar::Null < Scalar::Bool(false));
        assert!(Scalar::Bool(true) < Scalar::Int(-5));
        assert!(Scalar::Int(100) < Scalar::Float(0.5));
        assert!(Scalar::Float(1e9) < Scalar::str(""));
    }

    #[test]
    fn int_and_float_are_distinct() {
        assert_ne!(Scalar::Int(1), Scalar::Float(1.0));
    }

    #[test]
    fn nan_equals_itself_under_total_order() {
        assert_eq!(Scalar::Float(f64::NAN), Scalar::Float(f64::NAN));
    }

    #[test]
    fn blank_values() {
        assert!(Scalar::Null.is_blank());
        assert!(Scalar::str("").is_blank());
        assert!(!Scalar::str(" ").is_blank());
        assert!(!Scalar::Int(0).is_blank());
    }

    #[test]
    fn display_is_bare() {
        assert_eq!(Scalar::str("red").to_string(), "red");
        assert_eq!(Scalar::Int(3).to_string(), "3");
        assert_eq!(Scalar::Null.to_string(), "null");
    }
}
