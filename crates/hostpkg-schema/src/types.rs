use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A canonical, unversioned package name (e.g. `gettext-runtime`, not
/// `gettext-runtime-0.21`).
///
/// Construction never fails; validation of the "no `:` or newline" rule
/// happens at the point of use (writing an [`crate::manifest::InstalledRecord`]),
/// matching the way the store itself enforces that invariant rather than the
/// name type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Wrap an arbitrary string as a package name.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Truncate a dependency token at the first `-` followed by a digit.
    ///
    /// This is the typed replacement for the source's
    /// `sed 's/-[0-9].*//'` pass over dependency tokens such as
    /// `gettext-runtime-0.21`, which yields the canonical name
    /// `gettext-runtime`. Tokens with no such suffix (`foo-bar`) are
    /// returned unchanged.
    #[must_use]
    pub fn dep_base(&self) -> Self {
        Self(strip_version_suffix(&self.0).to_string())
    }
}

/// Truncate `token` at the first `-` immediately followed by an ASCII digit.
///
/// Examples: `foo-bar` -> `foo-bar` (no digit follows any hyphen), `foo-2`
/// -> `foo`, `foo-bar-1.2` -> `foo-bar`.
#[must_use]
pub fn strip_version_suffix(token: &str) -> &str {
    let bytes = token.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'-' && bytes.get(idx + 1).is_some_and(u8::is_ascii_digit) {
            return &token[..idx];
        }
        idx += 1;
    }
    token
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for PackageName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_version() {
        assert_eq!(strip_version_suffix("gettext-runtime-0.21"), "gettext-runtime");
        assert_eq!(strip_version_suffix("foo-2"), "foo");
        assert_eq!(strip_version_suffix("foo-bar-1.2"), "foo-bar");
    }

    #[test]
    fn leaves_non_versioned_tokens_alone() {
        assert_eq!(strip_version_suffix("foo-bar"), "foo-bar");
        assert_eq!(strip_version_suffix("foo"), "foo");
    }

    #[test]
    fn dep_base_method_matches_free_function() {
        let name = PackageName::new("openssl-3.0.12");
        assert_eq!(name.dep_base(), PackageName::new("openssl"));
    }
}
