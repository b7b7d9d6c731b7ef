//! The per-package manifest document and the installed-set store's line format.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The upstream prefix every manifest file path is rooted at.
pub const UPSTREAM_PREFIX: &str = "/usr/local";

/// A parsed `+MANIFEST` document: everything the engine needs to know about
/// one installed package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub origin: String,
    /// Keys are the package's direct dependencies (possibly
    /// name-with-version); values carry no engine-level meaning.
    #[serde(default)]
    pub deps: HashMap<String, serde_json::Value>,
    /// Keys are absolute file paths under [`UPSTREAM_PREFIX`] (e.g.
    /// `/usr/local/bin/foo`); values are upstream's own per-file metadata.
    #[serde(default)]
    pub files: HashMap<String, serde_json::Value>,
}

/// Sentinel used when a freshly extracted manifest is missing an expected
/// field, so the installed-store record can still be written.
pub const UNKNOWN_FIELD: &str = "unknown";

impl Manifest {
    /// Parse a `+MANIFEST` document from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not valid JSON conforming to the
    /// manifest schema.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Translate a manifest file-path key from the upstream prefix
    /// (`/usr/local/...`) to the given user prefix.
    ///
    /// Returns `None` if `key` does not live under [`UPSTREAM_PREFIX`].
    #[must_use]
    pub fn relocate(key: &str, user_prefix: &std::path::Path) -> Option<std::path::PathBuf> {
        let rel = key.strip_prefix(UPSTREAM_PREFIX)?.trim_start_matches('/');
        Some(user_prefix.join(rel))
    }

    /// The dependency name set, ignoring values.
    #[must_use]
    pub fn dep_names(&self) -> Vec<String> {
        self.deps.keys().cloned().collect()
    }
}

/// Errors a single installed-store line or its fields can violate.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InstalledRecordError {
    #[error("field {field:?} of installed record contains a forbidden character ({value:?})")]
    ForbiddenCharacter { field: &'static str, value: String },
    #[error("malformed installed-store line (expected 4 colon-separated fields): {0:?}")]
    Malformed(String),
}

/// One line of `installed_packages.txt`: `name:version:comment:origin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledRecord {
    pub name: String,
    pub version: String,
    pub comment: String,
    pub origin: String,
}

impl InstalledRecord {
    /// Construct a record, rejecting any field containing `:` or a newline.
    ///
    /// # Errors
    ///
    /// Returns [`InstalledRecordError::ForbiddenCharacter`] naming the first
    /// offending field.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        comment: impl Into<String>,
        origin: impl Into<String>,
    ) -> Result<Self, InstalledRecordError> {
        let record = Self {
            name: name.into(),
            version: version.into(),
            comment: comment.into(),
            origin: origin.into(),
        };
        record.validate()?;
        Ok(record)
    }

    fn validate(&self) -> Result<(), InstalledRecordError> {
        for (field, value) in [
            ("name", &self.name),
            ("version", &self.version),
            ("comment", &self.comment),
            ("origin", &self.origin),
        ] {
            if value.contains(':') || value.contains('\n') {
                return Err(InstalledRecordError::ForbiddenCharacter {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    /// Render as the `name:version:comment:origin` line (without trailing newline).
    #[must_use]
    pub fn to_line(&self) -> String {
        format!("{}:{}:{}:{}", self.name, self.version, self.comment, self.origin)
    }

    /// Parse a single store line.
    ///
    /// # Errors
    ///
    /// Returns [`InstalledRecordError::Malformed`] if the line does not have
    /// exactly four colon-separated fields.
    pub fn parse_line(line: &str) -> Result<Self, InstalledRecordError> {
        let mut parts = line.splitn(4, ':');
        let (Some(name), Some(version), Some(comment), Some(origin)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(InstalledRecordError::Malformed(line.to_string()));
        };
        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            comment: comment.to_string(),
            origin: origin.to_string(),
        })
    }
}
