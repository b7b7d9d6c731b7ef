//! Command-line interface for `hostpkg`, a rootless package manager for
//! shared-hosting environments without root access.
//!
//! This crate is a thin formatting and argument-parsing layer over
//! `hostpkg-core`; every subcommand in [`cmd`] does little more than call
//! into the engine and report the outcome through a [`ui::Reporter`].

/// Subcommand implementations.
pub mod cmd;
/// Shared per-invocation state.
pub mod ops;
/// Output/reporting abstraction.
pub mod ui;

use clap::{Parser, Subcommand};

/// `hostpkg`: install, update, and remove packages into a user-owned prefix.
#[derive(Debug, Parser)]
#[command(name = "hostpkg")]
#[command(author, version, about = "A rootless package manager", long_about = None)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The top-level subcommands (§6).
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install a package and its unsatisfied dependencies
    Install {
        /// Package name to install
        name: String,
        /// Install every dependency even if the host already shadows it
        #[arg(long)]
        full_deps: bool,
        /// Skip dependency resolution entirely
        #[arg(long)]
        no_deps: bool,
    },
    /// Update a package to the catalogue's current version
    Update {
        /// Package name to update
        name: String,
    },
    /// Remove an installed package
    Remove {
        /// Package name to remove
        name: String,
        /// Remove even if other installed packages depend on it
        #[arg(long)]
        force: bool,
        /// Do not remove dependencies left orphaned by this removal
        #[arg(long)]
        no_auto_remove: bool,
    },
    /// Search the cached catalogue
    Search {
        /// Search query (a regular expression)
        query: String,
        /// Also match against package comments, not just names
        #[arg(short = 'a', long)]
        all: bool,
    },
    /// Show a package's catalogue entry
    Info {
        /// Exact package name
        name: String,
    },
    /// List installed packages
    List,
    /// Refresh the cached upstream catalogue
    #[command(name = "update-metadata")]
    UpdateMetadata,
    /// Rebuild the shared-library symlink farm
    #[command(name = "fix-symlinks")]
    FixSymlinks,
}
