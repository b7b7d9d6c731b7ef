//! Component G: the Symlink Farm Manager. Maintains `SONAME` aliases and
//! purges dead links directly under `prefix/lib/`.

use std::path::Path;

use crate::error::Result;

/// Split `basename` into its `.so`-inclusive prefix and the leading run of
/// dot-separated numeric components that follow it.
///
/// Returns `None` if `basename` does not contain `.so` at all (such a file
/// is not a shared-library candidate and is skipped by [`reindex`]).
fn version_components(basename: &str) -> Option<(&str, Vec<&str>)> {
    let idx = basename.find(".so")?;
    let base = &basename[..idx + 3];
    let rest = &basename[idx + 3..];
    if rest.is_empty() {
        return Some((base, Vec::new()));
    }
    if !rest.starts_with('.') {
        return None;
    }
    Some((base, rest[1..].split('.').collect()))
}

fn numeric_prefix<'a>(comps: &[&'a str]) -> Vec<&'a str> {
    comps
        .iter()
        .take_while(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()))
        .copied()
        .collect()
}

/// Compute the set of flat-farm names a `.so`/`.so.*` file should be linked
/// under: the bare `.so` name, and (when enough numeric components are
/// present) its major-minor and major-only truncations. Returns an empty
/// vector if `basename` is not a shared-library candidate at all.
#[must_use]
fn candidate_names(basename: &str) -> Vec<String> {
    let Some((base, comps)) = version_components(basename) else {
        return Vec::new();
    };
    let nums = numeric_prefix(&comps);

    let mut names = vec![base.to_string()];
    if nums.len() >= 3 {
        names.push(format!("{base}.{}.{}", nums[0], nums[1]));
    }
    if !nums.is_empty() {
        names.push(format!("{base}.{}", nums[0]));
    }
    names.sort();
    names.dedup();
    names
}

/// Scan `lib_dir` for shared-library files at depth >= 2 and create any
/// missing flat-farm aliases directly under `lib_dir`.
///
/// Never overwrites an existing entry (file or symlink, dangling or not).
///
/// # Errors
///
/// Returns an error if `lib_dir` cannot be walked or a symlink cannot be
/// created.
pub fn reindex(lib_dir: &Path) -> Result<()> {
    if !lib_dir.exists() {
        return Ok(());
    }

    for entry in walkdir::WalkDir::new(lib_dir)
        .min_depth(2)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let Some(basename) = entry.file_name().to_str() else {
            continue;
        };
        let names = candidate_names(basename);
        if names.is_empty() {
            continue;
        }

        let Ok(rel_target) = entry.path().strip_prefix(lib_dir) else {
            continue;
        };

        for name in names {
            let link_path = lib_dir.join(&name);
            if link_path.symlink_metadata().is_ok() {
                continue;
            }
            tracing::debug!(name, target = %rel_target.display(), "linking shared library alias");
            #[cfg(unix)]
            std::os::unix::fs::symlink(rel_target, &link_path)
                .map_err(|e| crate::error::fs_err(&link_path, e))?;
        }
    }

    Ok(())
}

/// Delete every symlink directly under `lib_dir` (depth 1) whose target
/// does not resolve.
///
/// # Errors
///
/// Returns an error if `lib_dir` cannot be read or a dead link cannot be removed.
pub fn purge(lib_dir: &Path) -> Result<()> {
    if !lib_dir.exists() {
        return Ok(());
    }

    for entry in std::fs::read_dir(lib_dir).map_err(|e| crate::error::fs_err(lib_dir, e))? {
        let entry = entry.map_err(|e| crate::error::fs_err(lib_dir, e))?;
        let path = entry.path();

        let Ok(meta) = path.symlink_metadata() else {
            continue;
        };
        if !meta.file_type().is_symlink() {
            continue;
        }
        if std::fs::metadata(&path).is_err() {
            tracing::debug!(path = %path.display(), "purging dead symlink");
            std::fs::remove_file(&path).map_err(|e| crate::error::fs_err(&path, e))?;
        }
    }

    Ok(())
}
