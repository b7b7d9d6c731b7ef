//! `remove` subcommand.

use anyhow::Result;

use crate::ops::Context;

/// Remove `name`, optionally forcing past a required-by guard or skipping
/// the orphan sweep.
///
/// # Errors
///
/// Propagates [`hostpkg_core::EngineError::NotInstalled`] or
/// [`hostpkg_core::EngineError::RequiredBy`].
pub fn remove(ctx: &Context, name: &str, force: bool, no_auto_remove: bool) -> Result<()> {
    let opts = hostpkg_core::RemoveOpts {
        force,
        no_auto_remove,
        no_cleanup: false,
    };
    hostpkg_core::remove(name, opts)?;
    ctx.reporter.success(&format!("removed {name}"));
    Ok(())
}
