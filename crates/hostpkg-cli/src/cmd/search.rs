//! `search` subcommand.

use anyhow::Result;
use hostpkg_schema::SearchMode;

use crate::ops::Context;

/// Search the cached catalogue for `query`, by name only unless `all` is set.
///
/// # Errors
///
/// Returns [`hostpkg_core::EngineError::MetadataMissing`] if the catalogue
/// has never been fetched, or an error if `query` is not a valid regular
/// expression.
pub fn search(ctx: &Context, query: &str, all: bool) -> Result<()> {
    let index = hostpkg_core::catalogue::load()?;
    let mode = if all { SearchMode::All } else { SearchMode::Names };
    let hits = index.search(query, mode)?;

    if hits.is_empty() {
        ctx.reporter.info(&format!("no packages matching '{query}'"));
        return Ok(());
    }

    for hit in hits {
        println!("{} {}  {}", hit.name, hit.version, hit.comment);
    }

    Ok(())
}
