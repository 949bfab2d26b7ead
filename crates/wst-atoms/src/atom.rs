use std::fmt;
use std::str::FromStr;

use crate::error::{AtomError, AtomResult};

/// Separator used when none is configured.
pub const DEFAULT_SEPARATOR: &str = "+";

/// The value field of an atom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AtomValue {
    /// A single unit.
    Single(String),
    /// An encoded sub-list, `[a,b,c]`, whose units are added one by one.
    Units(Vec<String>),
}

impl AtomValue {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            Some(inner) if inner.trim().is_empty() => Self::Units(Vec::new()),
            Some(inner) => Self::Units(inner.split(',').map(|u| u.trim().to_string()).collect()),
            None => Self::Single(raw.to_string()),
        }
    }

    /// The units in order.
    pub fn units(&self) -> Vec<&str> {
        match self {
            Self::Single(v) => vec![v.as_str()],
            Self::Units(units) => units.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for AtomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(v) => write!(f, "{v}"),
            Self::Units(units) => write!(f, "[{}]", units.join(",")),
        }
    }
}

/// A single `object+property+value` fact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Atom {
    pub object: String,
    pub property: String,
    pub value: AtomValue,
}

impl Atom {
    /// Parse `"<object><sep><property><sep><value>"`.
    ///
    /// Anything other than exactly three parts is a format error.
    pub fn parse(raw: &str, separator: &str) -> AtomResult<Self> {
        if separator.is_empty() {
            return Err(AtomError::EmptySeparator);
        }
        let parts: Vec<&str> = raw.split(separator).collect();
        match parts.as_slice() {
            [object, property, value] => Ok(Self {
                object: (*object).to_string(),
                property: (*property).to_string(),
                value: AtomValue::parse(value),
            }),
            _ => Err(AtomError::Format {
                atom: raw.to_string(),
                separator: separator.to_string(),
                parts: parts.len(),
            }),
        }
    }

    /// Encode back into the delimited string form.
    pub fn encode(&self, separator: &str) -> String {
        format!(
            "{}{separator}{}{separator}{}",
            self.object, self.property, self.value
        )
    }
}

impl FromStr for Atom {
    type Err = AtomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, DEFAULT_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_atom() {
        let atom: Atom = "o1+colour+red".parse().unwrap();
        assert_eq!(atom.object, "o1");
        assert_eq!(atom.property, "colour");
        assert_eq!(atom.value, AtomValue::Single("red".into()));
    }

    #[test]
    fn parse_custom_separator() {
        let atom = Atom::parse("o1::size::3", "::").unwrap();
        assert_eq!(atom.property, "size");
        assert_eq!(atom.value.units(), vec!["3"]);
    }

    #[test]
    fn single_part_is_format_error() {
        let err = Atom::parse("onlyonepart", "+").unwrap_err();
        assert_eq!(
            err,
            AtomError::Format {
                atom: "onlyonepart".into(),
                separator: "+".into(),
                parts: 1,
            }
        );
    }

    #[test]
    fn too_many_parts_is_format_error() {
        let err = Atom::parse("a+b+c+d", "+").unwrap_err();
        assert!(matches!(err, AtomError::Format { parts: 4, .. }));
    }

    #[test]
    fn empty_separator_rejected() {
        assert_eq!(Atom::parse("a+b+c", "").unwrap_err(), AtomError::EmptySeparator);
    }

    #[test]
    fn sub_list_value() {
        let atom = Atom::parse("o1+tags+[a, b,c]", "+").unwrap();
        assert_eq!(atom.value.units(), vec!["a", "b", "c"]);
        let empty = Atom::parse("o1+tags+[]", "+").unwrap();
        assert!(empty.value.units().is_empty());
    }

    #[test]
    fn empty_value_is_a_unit() {
        let atom = Atom::parse("o1+note+", "+").unwrap();
        assert_eq!(atom.value, AtomValue::Single(String::new()));
    }

    #[test]
    fn encode_roundtrips_text() {
        let atom = Atom::parse("o1+tags+[a,b]", "+").unwrap();
        assert_eq!(atom.encode("+"), "o1+tags+[a,b]");
    }
}
