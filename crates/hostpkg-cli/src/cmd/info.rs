//! `info` subcommand.

use anyhow::Result;
use hostpkg_schema::PackageName;

use crate::ops::Context;

/// Print a fixed key/value block for the exact catalogue entry `name`.
///
/// # Errors
///
/// Returns [`hostpkg_core::EngineError::NotFound`] if `name` has no exact
/// catalogue entry, or [`hostpkg_core::EngineError::MetadataMissing`] if
/// the catalogue has never been fetched.
pub fn info(_ctx: &Context, name: &str) -> Result<()> {
    let index = hostpkg_core::catalogue::load()?;
    let package_name = PackageName::new(name);
    let entry = index
        .find_exact(&package_name)
        .ok_or_else(|| hostpkg_core::EngineError::NotFound(package_name.clone()))?;

    println!("Name:         {}", entry.name);
    println!("Version:      {}", entry.version);
    println!("Comment:      {}", entry.comment);
    println!("Origin:       {}", entry.origin);
    if !entry.www.is_empty() {
        println!("WWW:          {}", entry.www);
    }
    println!("Dependencies:");
    let mut deps: Vec<&String> = entry.deps.keys().collect();
    deps.sort();
    for dep in deps {
        println!("  {dep}");
    }

    Ok(())
}
