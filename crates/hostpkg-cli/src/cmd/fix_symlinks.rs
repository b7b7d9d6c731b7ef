//! `fix-symlinks` subcommand.

use anyhow::Result;

use crate::ops::Context;

/// Purge dead links then rebuild the symlink farm from scratch.
///
/// # Errors
///
/// Returns an error if `prefix/lib/` cannot be walked or modified.
pub fn fix_symlinks(ctx: &Context) -> Result<()> {
    let lib_dir = hostpkg_core::paths::lib_dir();
    hostpkg_core::symlinks::purge(&lib_dir)?;
    hostpkg_core::symlinks::reindex(&lib_dir)?;
    ctx.reporter.success("symlink farm rebuilt");
    Ok(())
}
