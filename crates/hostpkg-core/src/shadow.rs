//! Component F: the System-Shadow Probe. Heuristically decides whether a
//! bare package name is already satisfied by the host OS, so the installer
//! can skip installing it as a dependency.
//!
//! Used only for dependency skipping; the explicitly requested package is
//! never probed (§4.F).

use std::path::Path;

/// Directories searched for a shadowing shared library.
const LIB_SEARCH_DIRS: [&str; 2] = ["/usr/lib", "/usr/local/lib"];

/// Whether `name` (already stripped of any version suffix) is shadowed by
/// the host: an executable of that name is on `PATH`, a matching shared
/// library exists in one of [`LIB_SEARCH_DIRS`], or `pkg-config` knows
/// about it.
#[must_use]
pub fn is_shadowed(name: &str) -> bool {
    has_executable(name) || has_shared_library(name) || has_pkg_config(name)
}

fn has_executable(name: &str) -> bool {
    which::which(name).is_ok()
}

fn has_shared_library(name: &str) -> bool {
    LIB_SEARCH_DIRS.iter().any(|dir| {
        let dir = Path::new(dir);
        dir.join(format!("lib{name}.so")).exists() || dir.join(format!("{name}.so")).exists()
    })
}

fn has_pkg_config(name: &str) -> bool {
    pkg_config_knows(name) || pkg_config_knows(&format!("lib{name}"))
}

fn pkg_config_knows(module: &str) -> bool {
    let Ok(pkg_config) = which::which("pkg-config") else {
        return false;
    };
    std::process::Command::new(pkg_config)
        .arg("--exists")
        .arg(module)
        .status()
        .is_ok_and(|status| status.success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlikely_name_is_not_shadowed() {
        assert!(!is_shadowed("definitely-not-a-real-host-package-xyz123"));
    }

    #[test]
    fn common_shell_builtin_like_executable_is_shadowed() {
        // `sh` is present on every POSIX host this engine targets.
        assert!(has_executable("sh"));
    }
}
