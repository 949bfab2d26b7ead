//! Descriptor strings label tree keys upstream: `"<class>_..._<instance>"`.

/// The leading `_`-delimited token (the class name).
///
/// Returns `None` for an empty descriptor or an empty leading token.
pub fn class_prefix(descriptor: &str) -> Option<&str> {
    descriptor.split('_').next().filter(|t| !t.is_empty())
}

/// The trailing `_`-delimited token (the instance name).
///
/// Returns `None` for an empty descriptor or an empty trailing token.
pub fn instance_name(descriptor: &str) -> Option<&str> {
    descriptor.rsplit('_').next().filter(|t| !t.is_empty())
}
