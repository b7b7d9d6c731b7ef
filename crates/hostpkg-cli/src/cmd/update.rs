//! `update` subcommand.

use anyhow::Result;
use hostpkg_schema::Abi;

use crate::ops::Context;

/// Update `name` to the version the (freshly refreshed) catalogue carries,
/// if it differs from the installed one.
///
/// # Errors
///
/// Propagates [`hostpkg_core::EngineError::NotInstalled`] if `name` is not
/// currently installed, or any error from the refresh/remove/install cycle.
pub fn update(ctx: &Context, name: &str) -> Result<()> {
    let installed = hostpkg_core::store::read_all()?
        .into_iter()
        .find(|r| r.name == name)
        .ok_or_else(|| hostpkg_core::EngineError::NotInstalled(name.into()))?;

    let abi = Abi::detect()?;
    hostpkg_core::catalogue::refresh(&ctx.client, &abi)?;
    let index = hostpkg_core::catalogue::load()?;

    let Some(full_name) = index.find_fullname(name) else {
        return Err(hostpkg_core::EngineError::NotFound(name.into()).into());
    };

    let available_version = index
        .resolve_entry(name)
        .map(|e| e.version.clone())
        .unwrap_or_default();

    if available_version == installed.version {
        ctx.reporter.info(&format!("{name} is already up to date ({})", installed.version));
        return Ok(());
    }

    ctx.reporter.info(&format!(
        "updating {name}: {} -> {available_version}",
        installed.version
    ));

    hostpkg_core::remove(name, hostpkg_core::RemoveOpts::default())?;
    hostpkg_core::install(&ctx.client, name, hostpkg_core::InstallOpts::default())?;

    ctx.reporter.success(&format!("updated {full_name}"));
    Ok(())
}
