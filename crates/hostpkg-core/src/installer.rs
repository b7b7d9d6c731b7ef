//! Component H (installation half): the recursive install algorithm
//! described in §4.H, built on top of the resolver's dependency skipping
//! and cycle detection.

use std::path::Path;

use hostpkg_schema::{Abi, InstalledRecord, Manifest};

use crate::error::{EngineError, Result};
use crate::resolver::{InstallOpts, InstallStack};
use crate::{catalogue, extract, fetch, paths, resolver, store, symlinks};

/// Sentinel recorded for an installed-store field when the freshly
/// extracted manifest is missing it.
const UNKNOWN_FIELD: &str = hostpkg_schema::manifest::UNKNOWN_FIELD;

/// Install `name` and its unsatisfied dependencies into the prefix.
///
/// Idempotent: if `name` is already installed, returns `Ok(())` without
/// touching the network or filesystem beyond the catalogue load.
///
/// # Errors
///
/// Returns [`EngineError::NotFound`] if `name` has no catalogue entry, or
/// any network/archive/filesystem error encountered while fetching and
/// unpacking the package.
pub fn install(client: &reqwest::blocking::Client, name: &str, opts: InstallOpts) -> Result<()> {
    let mut stack = InstallStack::new();
    install_recursive(client, name, opts, &mut stack)
}

fn install_recursive(
    client: &reqwest::blocking::Client,
    name: &str,
    opts: InstallOpts,
    stack: &mut InstallStack,
) -> Result<()> {
    if stack.contains(name) {
        tracing::warn!(name, "dependency cycle detected, cutting edge");
        return Ok(());
    }

    stack.push(name);
    let outcome = install_one(client, name, opts, stack);
    stack.pop(name);
    outcome
}

fn install_one(
    client: &reqwest::blocking::Client,
    name: &str,
    opts: InstallOpts,
    stack: &mut InstallStack,
) -> Result<()> {
    paths::ensure_prefix_tree().map_err(|e| crate::error::fs_err(paths::prefix_root(), e))?;

    let abi = Abi::detect()?;
    let index = catalogue::load_or_refresh(client, &abi)?;

    let full_name = index
        .find_fullname(name)
        .ok_or_else(|| EngineError::NotFound(name.into()))?
        .to_string();

    if store::contains(name)? {
        tracing::info!(name, "already installed");
        return Ok(());
    }

    for dep in resolver::dependencies_to_install(&index, name, opts)? {
        install_recursive(client, &dep, opts.inherited(), stack)?;
    }

    let entry = index
        .resolve_entry(name)
        .ok_or_else(|| EngineError::NotFound(name.into()))?;
    let filename = entry.filename().to_string();
    let url = format!("{}/{filename}", abi.repo_base_url());

    let archive_path = paths::tmp_dir().join(&filename);
    fetch::fetch(client, &url, &archive_path)?;

    let extract_dir = tempfile::Builder::new()
        .prefix("install-")
        .tempdir_in(paths::tmp_dir())
        .map_err(|e| crate::error::fs_err(paths::tmp_dir(), e))?;
    extract::extract(&archive_path, extract_dir.path())?;

    let manifest_text = std::fs::read_to_string(extract_dir.path().join("+MANIFEST")).ok();

    let upstream_root = extract_dir.path().join("usr/local");
    if upstream_root.exists() {
        mirror_tree(&upstream_root, &paths::prefix_root())?;
    }

    symlinks::reindex(&paths::lib_dir())?;

    std::fs::remove_file(&archive_path).map_err(|e| crate::error::fs_err(&archive_path, e))?;

    let (version, comment, origin) = manifest_text
        .as_deref()
        .and_then(|text| Manifest::parse(text).ok())
        .map_or(
            (UNKNOWN_FIELD.to_string(), UNKNOWN_FIELD.to_string(), UNKNOWN_FIELD.to_string()),
            |m| (non_empty_or_unknown(m.version), non_empty_or_unknown(m.comment), non_empty_or_unknown(m.origin)),
        );

    // Validate before persisting anything: a rejected record (e.g. a `:` in
    // `comment`) must leave neither a manifest nor a store entry behind.
    let record = InstalledRecord::new(name, version, comment, origin)?;

    if let Some(text) = &manifest_text {
        store::write_manifest(name, text)?;
    }
    store::add(&record)?;

    tracing::info!(name, full_name, "installed");
    Ok(())
}

fn non_empty_or_unknown(field: String) -> String {
    if field.is_empty() {
        UNKNOWN_FIELD.to_string()
    } else {
        field
    }
}

/// Recursively copy every regular file under `src` into `dest`, preserving
/// relative paths and creating parent directories as needed.
fn mirror_tree(src: &Path, dest: &Path) -> Result<()> {
    for entry in walkdir::WalkDir::new(src)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let rel = entry
            .path()
            .strip_prefix(src)
            .expect("walkdir entries are always under src");
        let dest_path = dest.join(rel);
        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| crate::error::fs_err(parent, e))?;
        }
        std::fs::copy(entry.path(), &dest_path).map_err(|e| crate::error::fs_err(&dest_path, e))?;
    }
    Ok(())
}
