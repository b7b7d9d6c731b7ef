//! Component D: the Repository Index's network side -- downloading,
//! extracting, and caching the upstream catalogue. Lookup queries
//! themselves live on [`hostpkg_schema::PackageIndex`], which this module
//! loads from the cache file.

use std::path::Path;

use hostpkg_schema::{Abi, PackageIndex};

use crate::error::{EngineError, Result};
use crate::paths;

/// The archive's path, one level above the ABI-specific `All/` directory
/// that [`Abi::repo_base_url`] points into.
fn catalogue_archive_url(abi: &Abi) -> String {
    let base = abi.repo_base_url();
    let without_all = base
        .strip_suffix("/All")
        .expect("repo_base_url always ends in /All");
    format!("{without_all}/packagesite.tzst")
}

/// Download `<repo_base>/../packagesite.tzst`, decompress it, and extract
/// `packagesite.yaml` into the cache directory.
///
/// # Errors
///
/// Returns [`EngineError::Network`] if the download fails, or
/// [`EngineError::Archive`] if the downloaded archive cannot be decoded.
pub fn refresh(client: &reqwest::blocking::Client, abi: &Abi) -> Result<()> {
    paths::ensure_prefix_tree().map_err(|e| crate::error::fs_err(paths::cache_dir(), e))?;

    let url = catalogue_archive_url(abi);
    let archive_path = paths::catalogue_archive_path();

    tracing::info!(%url, "downloading package catalogue");
    crate::fetch::fetch(client, &url, &archive_path)?;

    let extract_dir = tempfile::Builder::new()
        .prefix("catalogue-")
        .tempdir_in(paths::tmp_dir())
        .map_err(|e| crate::error::fs_err(paths::tmp_dir(), e))?;

    crate::extract::extract(&archive_path, extract_dir.path())?;

    let extracted = find_packagesite_yaml(extract_dir.path())
        .ok_or_else(|| EngineError::Archive("packagesite.yaml missing from catalogue archive".into()))?;

    std::fs::copy(&extracted, paths::catalogue_path())
        .map_err(|e| crate::error::fs_err(paths::catalogue_path(), e))?;

    tracing::info!("package catalogue refreshed");
    Ok(())
}

fn find_packagesite_yaml(root: &Path) -> Option<std::path::PathBuf> {
    let direct = root.join("packagesite.yaml");
    if direct.exists() {
        return Some(direct);
    }
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .find(|e| e.file_name() == "packagesite.yaml")
        .map(walkdir::DirEntry::into_path)
}

/// Load the cached catalogue from disk.
///
/// # Errors
///
/// Returns [`EngineError::MetadataMissing`] if the cache file does not
/// exist (callers that are allowed to auto-refresh should call [`refresh`]
/// first and retry).
pub fn load() -> Result<PackageIndex> {
    let path = paths::catalogue_path();
    if !path.exists() {
        return Err(EngineError::MetadataMissing);
    }
    let text = std::fs::read_to_string(&path).map_err(|e| crate::error::fs_err(&path, e))?;
    Ok(PackageIndex::parse(&text))
}

/// Load the cached catalogue, refreshing first if it is absent.
///
/// This is the only query path allowed to auto-refresh (used by `install`).
///
/// # Errors
///
/// Propagates [`refresh`]'s and [`load`]'s errors.
pub fn load_or_refresh(client: &reqwest::blocking::Client, abi: &Abi) -> Result<PackageIndex> {
    if !paths::catalogue_path().exists() {
        refresh(client, abi)?;
    }
    load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_url_is_one_level_above_all() {
        let abi = Abi::new("FreeBSD", "14", "amd64");
        assert_eq!(
            catalogue_archive_url(&abi),
            "https://pkg.FreeBSD.org/FreeBSD:14:amd64/quarterly/packagesite.tzst"
        );
    }
}
