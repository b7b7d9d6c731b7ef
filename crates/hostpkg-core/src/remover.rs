//! Component I: the Remover. Deletes a package's files using its saved
//! manifest, optionally cascading into orphaned dependencies.

use hostpkg_schema::{types::strip_version_suffix, Manifest};

use crate::error::{EngineError, Result};
use crate::{paths, store, symlinks};

/// Flags accepted by `remove`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOpts {
    /// Skip the required-by guard.
    pub force: bool,
    /// Skip the orphan sweep of the package's own dependencies.
    pub no_auto_remove: bool,
    /// Skip the symlink-farm dead-link purge (used internally to run it
    /// only once per top-level user command).
    pub no_cleanup: bool,
}

/// Remove `name` from the prefix.
///
/// # Errors
///
/// Returns [`EngineError::NotInstalled`] if `name` has no store record, or
/// [`EngineError::RequiredBy`] if other installed packages depend on it and
/// `opts.force` is not set.
pub fn remove(name: &str, opts: RemoveOpts) -> Result<()> {
    if !store::contains(name)? {
        return Err(EngineError::NotInstalled(name.into()));
    }

    if !opts.force {
        let dependents = store::required_by(name)?;
        if !dependents.is_empty() {
            return Err(EngineError::RequiredBy(dependents.join(", ")));
        }
    }

    let manifest = store::read_manifest(name)?;
    let own_deps = manifest.dep_names();

    unlink_manifest_files(&manifest)?;
    remove_empty_directories(&paths::prefix_root())?;

    store::remove(name)?;
    store::remove_manifest(name)?;

    if !opts.no_auto_remove {
        sweep_orphans(&own_deps)?;
    }

    if !opts.no_cleanup {
        symlinks::purge(&paths::lib_dir())?;
    }

    tracing::info!(name, "removed");
    Ok(())
}

fn unlink_manifest_files(manifest: &Manifest) -> Result<()> {
    let prefix = paths::prefix_root();
    for key in manifest.files.keys() {
        let Some(path) = Manifest::relocate(key, &prefix) else {
            continue;
        };
        match std::fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => {
                // Directories are handled by the later bottom-up sweep; only
                // remove here if already empty to match §4.I step 4 exactly.
                let _ = std::fs::remove_dir(&path);
            }
            Ok(_) => {
                std::fs::remove_file(&path).map_err(|e| crate::error::fs_err(&path, e))?;
            }
            Err(_) => {}
        }
    }
    Ok(())
}

/// Remove every empty directory below `root`, deepest first.
fn remove_empty_directories(root: &std::path::Path) -> Result<()> {
    let mut dirs: Vec<_> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
        .collect();

    dirs.sort_by_key(|p| std::cmp::Reverse(p.components().count()));

    for dir in dirs {
        if std::fs::read_dir(&dir).is_ok_and(|mut entries| entries.next().is_none()) {
            let _ = std::fs::remove_dir(&dir);
        }
    }
    Ok(())
}

fn sweep_orphans(saved_deps: &[String]) -> Result<()> {
    for dep_token in saved_deps {
        let dep_base = strip_version_suffix(dep_token).to_string();
        if !store::contains(&dep_base)? {
            continue;
        }
        if !store::required_by(&dep_base)?.is_empty() {
            continue;
        }
        remove(
            &dep_base,
            RemoveOpts {
                force: false,
                no_auto_remove: false,
                no_cleanup: true,
            },
        )?;
    }
    Ok(())
}
