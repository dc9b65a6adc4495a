//! Config field path.

use std::fmt;

/// Location of a config value (`site.base_path`), used to point
/// diagnostics at the offending key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath {
    section: &'static str,
    key: &'static str,
}

impl FieldPath {
    /// One key inside a `[section]`.
    #[inline]
    pub const fn field(section: &'static str, key: &'static str) -> Self {
        Self { section, key }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.key)
    }
}
