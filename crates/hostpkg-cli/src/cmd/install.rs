//! `install` subcommand.

use anyhow::Result;

use crate::ops::Context;

/// Install `name` and its unsatisfied dependencies.
///
/// # Errors
///
/// Propagates any [`hostpkg_core::EngineError`] raised during resolution or
/// installation.
pub fn install(ctx: &Context, name: &str, full_deps: bool, no_deps: bool) -> Result<()> {
    if hostpkg_core::store::contains(name)? {
        ctx.reporter.warning(&format!("{name} is already installed"));
        return Ok(());
    }
    let opts = hostpkg_core::InstallOpts { full_deps, no_deps };
    hostpkg_core::install(&ctx.client, name, opts)?;
    ctx.reporter.success(&format!("installed {name}"));
    Ok(())
}
