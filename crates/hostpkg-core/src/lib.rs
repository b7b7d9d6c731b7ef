//! Core engine for `hostpkg`: a rootless, FreeBSD-pkg-style package manager.
//!
//! The engine is single-threaded, synchronous, and blocking throughout
//! (§5): one process, one command, no concurrency primitives. Modules are
//! organized by the component table this crate implements:
//!
//! - [`paths`] -- the prefix layout (component, §6).
//! - [`fetch`] -- component B, downloads a URL to a local path atomically.
//! - [`extract`] -- component C, unpacks a `zstd`-compressed tar archive.
//! - [`catalogue`] -- component D's network/caching side; pure queries
//!   live on [`hostpkg_schema::PackageIndex`].
//! - [`store`] -- component E, the installed-set store and manifests.
//! - [`shadow`] -- component F, the system-shadow probe.
//! - [`symlinks`] -- component G, the shared-library symlink farm.
//! - [`resolver`] -- component H's dependency resolution and cycle guard.
//! - [`installer`] -- component H's install orchestration.
//! - [`remover`] -- component I.
//! - [`lock`] -- the advisory cross-invocation prefix lock (§5).

/// The upstream catalogue: download, cache, and load (component D).
pub mod catalogue;
/// Archive decompression and extraction (component C).
pub mod extract;
/// Engine error taxonomy.
pub mod error;
/// HTTP download with atomic write (component B).
pub mod fetch;
/// Recursive install algorithm (component H).
pub mod installer;
/// The advisory prefix lock.
pub mod lock;
/// The prefix directory layout.
pub mod paths;
/// Dependency resolution and install-stack cycle detection (component H).
pub mod resolver;
/// Package removal with orphan sweep (component I).
pub mod remover;
/// System-shadow probe (component F).
pub mod shadow;
/// Installed-set store and manifest persistence (component E).
pub mod store;
/// Shared-library symlink farm (component G).
pub mod symlinks;

pub use error::{EngineError, Result};
pub use installer::install;
pub use lock::PrefixLock;
pub use remover::remove;
pub use resolver::{InstallOpts, InstallStack};
pub use remover::RemoveOpts;
