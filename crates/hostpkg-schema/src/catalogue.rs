//! In-memory representation of, and pure queries over, an already-parsed
//! upstream package catalogue.
//!
//! Downloading and caching the catalogue (component D's network side) is
//! `hostpkg_core`'s job; this module only knows how to parse the
//! newline-delimited JSON feed and answer lookups against it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::PackageName;

/// One record from the upstream `packagesite.yaml` feed.
///
/// Despite the `.yaml` extension inherited from the upstream tooling, the
/// feed is newline-delimited JSON: one compact object per line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub maintainer: String,
    #[serde(default)]
    pub www: String,
    #[serde(default)]
    pub arch: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub licenselogic: String,
    #[serde(default)]
    pub licenses: Vec<String>,
    #[serde(default)]
    pub pkgsize: u64,
    #[serde(default)]
    pub flatsize: u64,
    /// Only the key set is significant; values are the upstream's own
    /// per-dependency metadata and carry no meaning here.
    #[serde(default)]
    pub deps: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub path: String,
}

impl CatalogueEntry {
    /// The archive filename, derived from the final path component of `path`.
    #[must_use]
    pub fn filename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// An in-memory, queryable view of the catalogue.
#[derive(Debug, Default)]
pub struct PackageIndex {
    entries: Vec<CatalogueEntry>,
}

/// Search scope for [`PackageIndex::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Match against `name` only.
    Names,
    /// Match against `name` or `comment`.
    All,
}

/// A single row of [`PackageIndex::search`] output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub name: String,
    pub version: String,
    pub comment: String,
}

impl PackageIndex {
    /// Parse a newline-delimited JSON catalogue feed.
    ///
    /// Malformed lines are skipped, never panicked on, per the engine's
    /// error-handling contract: a corrupt catalogue degrades gracefully
    /// rather than aborting every query.
    #[must_use]
    pub fn parse(feed: &str) -> Self {
        let entries = feed
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<CatalogueEntry>(line) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(%err, "skipping malformed catalogue record");
                    None
                }
            })
            .collect();

        Self { entries }
    }

    /// Number of parsed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `query` to a catalogue entry using the hyphen-version lookup
    /// convention: exact `name` match first, else the first record whose
    /// `name` starts with `query-` (version-prefixed), with ties broken by
    /// lexicographically smallest `name` for determinism across refreshes.
    fn resolve(&self, query: &str) -> Option<&CatalogueEntry> {
        if let Some(exact) = self.entries.iter().find(|e| e.name == query) {
            return Some(exact);
        }

        let prefix = format!("{query}-");
        self.entries
            .iter()
            .filter(|e| e.name.starts_with(&prefix))
            .min_by(|a, b| a.name.cmp(&b.name))
    }

    /// The exact `name` field of the resolved entry, if any.
    #[must_use]
    pub fn find_fullname(&self, query: &str) -> Option<&str> {
        self.resolve(query).map(|e| e.name.as_str())
    }

    /// The full resolved entry (exact name match, else hyphen-version
    /// prefix fallback). Used by the installer to fetch the archive.
    #[must_use]
    pub fn resolve_entry(&self, query: &str) -> Option<&CatalogueEntry> {
        self.resolve(query)
    }

    /// A named scalar field of the resolved entry, as a generic JSON value.
    #[must_use]
    pub fn get_field(&self, query: &str, field: &str) -> Option<serde_json::Value> {
        let entry = self.resolve(query)?;
        let value = serde_json::to_value(entry).ok()?;
        value.get(field).cloned()
    }

    /// The dependency name set of the resolved entry; empty if unresolved
    /// or dependency-free.
    #[must_use]
    pub fn get_deps(&self, query: &str) -> Vec<String> {
        self.resolve(query)
            .map(|e| e.deps.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// The full entry, by exact canonical name (no hyphen-version fallback).
    /// Used by `info`, which requires an exact match.
    #[must_use]
    pub fn find_exact(&self, name: &PackageName) -> Option<&CatalogueEntry> {
        self.entries.iter().find(|e| e.name == name.as_str())
    }

    /// Case-insensitive regular-expression search over `name` (and
    /// `comment`, in [`SearchMode::All`]), in catalogue order.
    ///
    /// # Errors
    ///
    /// Returns an error if `query` is not a valid regular expression.
    pub fn search(&self, query: &str, mode: SearchMode) -> Result<Vec<SearchHit>, regex::Error> {
        let re = regex::RegexBuilder::new(query)
            .case_insensitive(true)
            .build()?;

        Ok(self
            .entries
            .iter()
            .filter(|e| re.is_match(&e.name) || (mode == SearchMode::All && re.is_match(&e.comment)))
            .map(|e| SearchHit {
                name: e.name.clone(),
                version: e.version.clone(),
                comment: e.comment.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PackageIndex {
        PackageIndex::parse(
            r#"{"name":"hello","version":"2.12","comment":"friendly greeter","deps":{}}
{"name":"hello-traditional","version":"2.10","comment":"classic greeter","deps":{}}
{"name":"gettext-runtime","version":"0.21","comment":"i18n runtime","deps":{}}
not json at all
{"name":"curl","version":"8.4.0","comment":"transfer a URL","deps":{"openssl":1,"zlib":1}}
"#,
        )
    }

    #[test]
    fn skips_malformed_lines() {
        assert_eq!(sample().len(), 4);
    }

    #[test]
    fn exact_match_wins_over_prefix() {
        let idx = sample();
        assert_eq!(idx.find_fullname("hello"), Some("hello"));
    }

    #[test]
    fn prefix_fallback_and_tiebreak() {
        let idx = PackageIndex::parse(
            r#"{"name":"foo-2.0","version":"2.0","comment":"","deps":{}}
{"name":"foo-1.0","version":"1.0","comment":"","deps":{}}
"#,
        );
        // Neither is an exact match for "foo"; tie broken lexicographically.
        assert_eq!(idx.find_fullname("foo"), Some("foo-1.0"));
    }

    #[test]
    fn get_deps_returns_key_set() {
        let idx = sample();
        let mut deps = idx.get_deps("curl");
        deps.sort();
        assert_eq!(deps, vec!["openssl".to_string(), "zlib".to_string()]);
        assert!(idx.get_deps("hello").is_empty());
        assert!(idx.get_deps("nonexistent").is_empty());
    }

    #[test]
    fn search_names_only_vs_all() {
        let idx = sample();
        let names_only = idx.search("greeter", SearchMode::Names).unwrap();
        assert!(names_only.is_empty());

        let all = idx.search("greeter", SearchMode::All).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "hello");
    }
}
