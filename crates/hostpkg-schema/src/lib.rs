//! Shared types and wire format for the `hostpkg` package manager.
//!
//! This crate defines the canonical data structures used across the engine
//! and the CLI: the ABI triple, the catalogue entry and in-memory index, the
//! per-package manifest, and the installed-set store's line format. None of
//! these types perform network or filesystem I/O themselves (that's
//! `hostpkg-core`'s job) -- they are the wire/value layer the rest of the
//! crate graph builds on.

/// The host ABI triple and repository base URL (component A).
pub mod abi;
/// Catalogue entry type and pure in-memory queries over a parsed catalogue (component D).
pub mod catalogue;
/// Per-package manifest document and installed-store line format (components E, §3).
pub mod manifest;
/// Canonical package name newtype and version-suffix stripping.
pub mod types;

pub use abi::Abi;
pub use catalogue::{CatalogueEntry, PackageIndex, SearchHit, SearchMode};
pub use manifest::{InstalledRecord, Manifest};
pub use types::PackageName;
