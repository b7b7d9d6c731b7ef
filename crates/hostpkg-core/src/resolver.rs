//! Component H (resolution half): turns a package's declared dependency
//! tokens into the set of canonical names the installer still needs to
//! recurse into, applying the installed-store and system-shadow skips from
//! §4.H step 5.

use std::collections::HashSet;

use hostpkg_schema::{types::strip_version_suffix, PackageIndex};

use crate::error::Result;
use crate::{shadow, store};

/// Flags accepted by `install`. `no_deps` and `full_deps` are independent;
/// when both are set, `no_deps` wins (dependency enumeration is skipped
/// outright, so there is nothing for `full_deps` to affect).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOpts {
    /// Install every dependency even if the System-Shadow Probe would
    /// otherwise skip it.
    pub full_deps: bool,
    /// Skip dependency resolution entirely; install only the named package.
    pub no_deps: bool,
}

impl InstallOpts {
    /// The flag bundle inherited by a recursive dependency install:
    /// `full_deps` propagates, `no_deps` does not (§4.H step 5).
    #[must_use]
    pub fn inherited(self) -> Self {
        Self {
            full_deps: self.full_deps,
            no_deps: false,
        }
    }
}

/// The set of names currently being installed in the active recursive
/// chain, used to detect and cut dependency cycles.
#[derive(Debug, Default)]
pub struct InstallStack(HashSet<String>);

impl InstallStack {
    /// A fresh, empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is already being installed higher up the recursion.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Push `name` onto the stack. Call [`Self::pop`] when the recursive
    /// call for `name` returns, regardless of outcome.
    pub fn push(&mut self, name: &str) {
        self.0.insert(name.to_string());
    }

    /// Pop `name` off the stack.
    pub fn pop(&mut self, name: &str) {
        self.0.remove(name);
    }
}

/// Compute the canonical dependency names the installer must still recurse
/// into for `name`, after the install-store and shadow-probe skips.
///
/// Returns an empty vector if `opts.no_deps` is set.
///
/// # Errors
///
/// Returns an error if the installed store cannot be read.
pub fn dependencies_to_install(catalogue: &PackageIndex, name: &str, opts: InstallOpts) -> Result<Vec<String>> {
    if opts.no_deps {
        return Ok(Vec::new());
    }

    let mut to_install = Vec::new();
    for dep_token in catalogue.get_deps(name) {
        let dep_base = strip_version_suffix(&dep_token).to_string();

        if store::contains(&dep_base)? {
            continue;
        }
        if !opts.full_deps && shadow::is_shadowed(&dep_base) {
            tracing::info!(dep = dep_base, "dependency shadowed by host, skipping");
            continue;
        }
        to_install.push(dep_base);
    }
    Ok(to_install)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherited_keeps_full_deps_but_clears_no_deps() {
        let opts = InstallOpts {
            full_deps: true,
            no_deps: true,
        };
        let inherited = opts.inherited();
        assert!(inherited.full_deps);
        assert!(!inherited.no_deps);
    }

    #[test]
    fn install_stack_tracks_membership() {
        let mut stack = InstallStack::new();
        assert!(!stack.contains("a"));
        stack.push("a");
        assert!(stack.contains("a"));
        stack.pop("a");
        assert!(!stack.contains("a"));
    }

    #[test]
    fn no_deps_short_circuits_enumeration() {
        let idx = PackageIndex::parse(
            r#"{"name":"hello","version":"2.12","comment":"","deps":{"gettext-runtime-0.21":1}}
"#,
        );
        let deps = dependencies_to_install(&idx, "hello", InstallOpts { full_deps: false, no_deps: true }).unwrap();
        assert!(deps.is_empty());
    }
}
