//! Component E: the Installed-Set Store. Persists the installed-package list
//! and the per-package manifest documents.
//!
//! `add` is idempotent and `remove` rewrites the whole file without the
//! matching line; both are synchronous and non-atomic at the file level
//! (matching §4.E: "each line is atomic at the OS write-size"), which is
//! acceptable because the engine never runs two operations concurrently
//! against the same prefix (§5's advisory lock enforces that).

use hostpkg_schema::{InstalledRecord, Manifest};

use crate::error::{EngineError, Result};
use crate::paths;

/// Read every record currently in the store.
///
/// Malformed lines are skipped rather than failing the whole read, mirroring
/// the catalogue's "never panic on a bad record" policy.
///
/// # Errors
///
/// Returns an error if the store file exists but cannot be read.
pub fn read_all() -> Result<Vec<InstalledRecord>> {
    let path = paths::installed_store_path();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(&path).map_err(|e| crate::error::fs_err(&path, e))?;
    Ok(text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| match InstalledRecord::parse_line(l) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(%err, line = l, "skipping malformed installed-store record");
                None
            }
        })
        .collect())
}

/// Whether `name` (canonical, unversioned) already has a store record.
///
/// # Errors
///
/// Returns an error if the store file exists but cannot be read.
pub fn contains(name: &str) -> Result<bool> {
    Ok(read_all()?.iter().any(|r| r.name == name))
}

/// Append `record` to the store. A no-op if a record for `record.name`
/// already exists.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub fn add(record: &InstalledRecord) -> Result<()> {
    if contains(&record.name)? {
        return Ok(());
    }

    paths::ensure_prefix_tree().map_err(|e| crate::error::fs_err(paths::prefix_root(), e))?;
    let path = paths::installed_store_path();
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| crate::error::fs_err(&path, e))?;
    writeln!(file, "{}", record.to_line()).map_err(|e| crate::error::fs_err(&path, e))?;
    Ok(())
}

/// Remove the store record for `name`, if present. A no-op otherwise.
///
/// # Errors
///
/// Returns an error if the store cannot be read or rewritten.
pub fn remove(name: &str) -> Result<()> {
    let path = paths::installed_store_path();
    if !path.exists() {
        return Ok(());
    }

    let remaining: Vec<InstalledRecord> = read_all()?.into_iter().filter(|r| r.name != name).collect();
    let mut body = String::new();
    for record in &remaining {
        body.push_str(&record.to_line());
        body.push('\n');
    }
    std::fs::write(&path, body).map_err(|e| crate::error::fs_err(&path, e))
}

/// Read and parse the manifest for `name`.
///
/// # Errors
///
/// Returns an error if the manifest file does not exist or is not valid JSON.
pub fn read_manifest(name: &str) -> Result<Manifest> {
    let path = paths::manifest_path(name);
    let text = std::fs::read_to_string(&path).map_err(|e| crate::error::fs_err(&path, e))?;
    Ok(Manifest::parse(&text)?)
}

/// Whether a manifest file exists for `name`.
#[must_use]
pub fn manifest_exists(name: &str) -> bool {
    paths::manifest_path(name).exists()
}

/// Write raw manifest `contents` (already-serialized JSON) for `name`.
///
/// # Errors
///
/// Returns an error if the manifests directory or file cannot be written.
pub fn write_manifest(name: &str, contents: &str) -> Result<()> {
    std::fs::create_dir_all(paths::manifests_dir())
        .map_err(|e| crate::error::fs_err(paths::manifests_dir(), e))?;
    let path = paths::manifest_path(name);
    std::fs::write(&path, contents).map_err(|e| crate::error::fs_err(&path, e))
}

/// Delete the manifest file for `name`, if present.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn remove_manifest(name: &str) -> Result<()> {
    let path = paths::manifest_path(name);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(crate::error::fs_err(&path, e)),
    }
}

/// Find the canonical store name a dependents-search should use: exact or
/// hyphen-version-prefixed match against `target`, per §4.I step 2.
#[must_use]
pub fn lists_as_dependency(manifest: &Manifest, target: &str) -> bool {
    manifest
        .dep_names()
        .iter()
        .any(|d| d == target || hostpkg_schema::types::strip_version_suffix(d) == target)
}

/// Compute the set of installed packages that require `target`, by scanning
/// every installed manifest's dependency keys.
///
/// # Errors
///
/// Returns an error if the store or any manifest cannot be read.
pub fn required_by(target: &str) -> Result<Vec<String>> {
    let mut dependents = Vec::new();
    for record in read_all()? {
        if record.name == target {
            continue;
        }
        match read_manifest(&record.name) {
            Ok(manifest) if lists_as_dependency(&manifest, target) => dependents.push(record.name),
            Ok(_) => {}
            Err(EngineError::Filesystem { .. }) => {
                // Manifest missing for an installed record violates P1; treat
                // as "no dependency info available" rather than failing the
                // whole required-by scan.
            }
            Err(e) => return Err(e),
        }
    }
    dependents.sort();
    Ok(dependents)
}
