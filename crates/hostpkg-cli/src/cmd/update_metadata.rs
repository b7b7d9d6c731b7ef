//! `update-metadata` subcommand.

use anyhow::Result;
use hostpkg_schema::Abi;

use crate::ops::Context;

/// Refresh the cached upstream catalogue.
///
/// # Errors
///
/// Propagates [`hostpkg_core::EngineError::EnvProbe`] or any fetch/archive error.
pub fn update_metadata(ctx: &Context) -> Result<()> {
    let abi = Abi::detect()?;
    hostpkg_core::catalogue::refresh(&ctx.client, &abi)?;
    ctx.reporter.success("package catalogue refreshed");
    Ok(())
}
