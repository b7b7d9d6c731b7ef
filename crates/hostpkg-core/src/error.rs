//! The engine's error taxonomy (§7).
//!
//! Every variant here surfaces to the CLI dispatcher as a non-zero exit,
//! except where the call site explicitly downgrades a condition to a
//! logged warning (`already-installed`, a cut cycle, a shadowed
//! dependency) and returns `Ok(())` instead of propagating.

use hostpkg_schema::PackageName;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the core engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not determine host ABI: {0}")]
    EnvProbe(#[from] hostpkg_schema::abi::AbiError),

    #[error("package catalogue is not present; run update-metadata first")]
    MetadataMissing,

    #[error("network request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("archive error: {0}")]
    Archive(String),

    #[error("package '{0}' not found in catalogue")]
    NotFound(PackageName),

    #[error("package '{0}' is not installed")]
    NotInstalled(PackageName),

    #[error("required by: {0}")]
    RequiredBy(String),

    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("required tool '{0}' is unavailable")]
    Tooling(&'static str),

    #[error("another invocation holds the prefix lock")]
    Busy,

    #[error("invalid installed-store record: {0}")]
    Record(#[from] hostpkg_schema::manifest::InstalledRecordError),

    #[error("malformed manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Convenience constructor for filesystem errors that attaches the offending path.
pub fn fs_err(path: impl Into<PathBuf>, source: std::io::Error) -> EngineError {
    EngineError::Filesystem {
        path: path.into(),
        source,
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
