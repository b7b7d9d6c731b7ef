//! The prefix layout (§6): where everything the engine manages lives.

use std::path::PathBuf;

/// Environment variable that overrides the prefix root.
pub const PREFIX_ENV_VAR: &str = "HOSTPKG_PREFIX";

/// Returns the prefix root, honoring [`PREFIX_ENV_VAR`] before falling back
/// to `$HOME/.hostpkg`.
///
/// # Panics
///
/// Panics if `HOSTPKG_PREFIX` is unset and the user's home directory cannot
/// be resolved; this mirrors the source, which has no fallback either.
#[must_use]
pub fn prefix_root() -> PathBuf {
    try_prefix_root().expect("could not determine home directory; set HOSTPKG_PREFIX to override")
}

/// Fallible variant of [`prefix_root`].
#[must_use]
pub fn try_prefix_root() -> Option<PathBuf> {
    if let Ok(val) = std::env::var(PREFIX_ENV_VAR) {
        return Some(PathBuf::from(val));
    }
    dirs::home_dir().map(|h| h.join(".hostpkg"))
}

/// `prefix/bin`
#[must_use]
pub fn bin_dir() -> PathBuf {
    prefix_root().join("bin")
}

/// `prefix/sbin`
#[must_use]
pub fn sbin_dir() -> PathBuf {
    prefix_root().join("sbin")
}

/// `prefix/lib` -- the symlink farm lives here too.
#[must_use]
pub fn lib_dir() -> PathBuf {
    prefix_root().join("lib")
}

/// `prefix/libdata`
#[must_use]
pub fn libdata_dir() -> PathBuf {
    prefix_root().join("libdata")
}

/// `prefix/include`
#[must_use]
pub fn include_dir() -> PathBuf {
    prefix_root().join("include")
}

/// `prefix/share`
#[must_use]
pub fn share_dir() -> PathBuf {
    prefix_root().join("share")
}

/// `prefix/installed_packages.txt`, the installed-set store (component E).
#[must_use]
pub fn installed_store_path() -> PathBuf {
    prefix_root().join("installed_packages.txt")
}

/// `prefix/manifests`
#[must_use]
pub fn manifests_dir() -> PathBuf {
    prefix_root().join("manifests")
}

/// `prefix/manifests/<name>.manifest`
#[must_use]
pub fn manifest_path(name: &str) -> PathBuf {
    manifests_dir().join(format!("{name}.manifest"))
}

/// `prefix/cache`
#[must_use]
pub fn cache_dir() -> PathBuf {
    prefix_root().join("cache")
}

/// `prefix/cache/packagesite.yaml`, the extracted catalogue.
#[must_use]
pub fn catalogue_path() -> PathBuf {
    cache_dir().join("packagesite.yaml")
}

/// `prefix/cache/packagesite.tzst`, the last downloaded catalogue archive.
#[must_use]
pub fn catalogue_archive_path() -> PathBuf {
    cache_dir().join("packagesite.tzst")
}

/// `prefix/tmp`, per-invocation scratch space.
#[must_use]
pub fn tmp_dir() -> PathBuf {
    prefix_root().join("tmp")
}

/// `prefix/tmp/.lock`, the advisory cross-invocation lock file.
#[must_use]
pub fn lock_path() -> PathBuf {
    tmp_dir().join(".lock")
}

/// The six subdirectories created (on demand) directly under the prefix.
pub const SKELETON_DIRS: [fn() -> PathBuf; 6] =
    [bin_dir, sbin_dir, lib_dir, libdata_dir, include_dir, share_dir];

/// Create the prefix tree and all ancillary directories if missing.
///
/// # Errors
///
/// Returns an error if any directory cannot be created.
pub fn ensure_prefix_tree() -> std::io::Result<()> {
    for dir in SKELETON_DIRS {
        std::fs::create_dir_all(dir())?;
    }
    std::fs::create_dir_all(manifests_dir())?;
    std::fs::create_dir_all(cache_dir())?;
    std::fs::create_dir_all(tmp_dir())?;
    Ok(())
}
