use serde::{Deserialize, Serialize};
use std::fmt;

/// The `os_type:os_major:arch` triple identifying which prebuilt package set
/// applies to the current host, plus the fixed repository branch.
///
/// Probed once per process by [`crate::abi::Abi::detect`] (component A,
/// "Environment Probe"); everything downstream treats it as an immutable
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Abi {
    os_type: String,
    os_major: String,
    arch: String,
}

/// The fixed upstream branch. A faithful port of the source's hardcoded
/// `quarterly` branch name; see DESIGN.md for why this isn't user-configurable.
pub const BRANCH: &str = "quarterly";

/// Scheme and host of the upstream repository mirror.
pub const REPO_SCHEME: &str = "https";
/// Host serving the package repository.
pub const REPO_HOST: &str = "pkg.FreeBSD.org";

#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    #[error("could not determine operating system release: {0}")]
    ReleaseProbe(String),
    #[error("operating system release string has no leading version number: {0:?}")]
    NoLeadingVersion(String),
}

impl Abi {
    /// Probe the host for its OS type, major OS version, and architecture.
    ///
    /// The OS type and architecture come from the build target
    /// (`std::env::consts`); the major version is the leading integer of
    /// the kernel release string (`uname -r`), e.g. `14.1-RELEASE` -> `14`.
    ///
    /// # Errors
    ///
    /// Returns [`AbiError`] if `uname -r` cannot be run or its output has no
    /// leading integer.
    pub fn detect() -> Result<Self, AbiError> {
        let release = read_kernel_release()?;
        let os_major = leading_integer(&release)
            .ok_or_else(|| AbiError::NoLeadingVersion(release.clone()))?;

        Ok(Self {
            os_type: os_type_name().to_string(),
            os_major,
            arch: std::env::consts::ARCH.to_string(),
        })
    }

    /// Construct an ABI directly, bypassing host probing. Used by tests and
    /// by callers that already know the target triple.
    pub fn new(os_type: impl Into<String>, os_major: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os_type: os_type.into(),
            os_major: os_major.into(),
            arch: arch.into(),
        }
    }

    /// The `os:major:arch` triple string used as a URL path segment.
    #[must_use]
    pub fn triple(&self) -> String {
        format!("{}:{}:{}", self.os_type, self.os_major, self.arch)
    }

    /// The repository base URL: `<scheme>://<host>/<abi>/<branch>/All`.
    #[must_use]
    pub fn repo_base_url(&self) -> String {
        format!("{}/{}/{BRANCH}/All", repo_origin(), self.triple())
    }
}

/// The repository's scheme and host, as a URL origin.
///
/// Behind the `test-support` feature only, this honors
/// `HOSTPKG_TEST_REPO_ORIGIN` so integration tests can point the engine at
/// a local mock server; the production build has no such override and
/// always resolves to `REPO_SCHEME://REPO_HOST`, matching §6's closed set
/// of environment variables the engine consumes.
fn repo_origin() -> String {
    #[cfg(feature = "test-support")]
    {
        if let Ok(origin) = std::env::var("HOSTPKG_TEST_REPO_ORIGIN") {
            return origin;
        }
    }
    format!("{REPO_SCHEME}://{REPO_HOST}")
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.triple())
    }
}

fn os_type_name() -> &'static str {
    match std::env::consts::OS {
        "freebsd" => "FreeBSD",
        "linux" => "Linux",
        "macos" => "Darwin",
        other => other,
    }
}

fn read_kernel_release() -> Result<String, AbiError> {
    let output = std::process::Command::new("uname")
        .arg("-r")
        .output()
        .map_err(|e| AbiError::ReleaseProbe(e.to_string()))?;

    if !output.status.success() {
        return Err(AbiError::ReleaseProbe(format!(
            "uname -r exited with {}",
            output.status
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Extract the leading run of ASCII digits from `release` (e.g. `"14.1-RELEASE"` -> `"14"`).
fn leading_integer(release: &str) -> Option<String> {
    let digits: String = release.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() { None } else { Some(digits) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_integer_extracts_major_version() {
        assert_eq!(leading_integer("14.1-RELEASE"), Some("14".to_string()));
        assert_eq!(leading_integer("9-CURRENT"), Some("9".to_string()));
        assert_eq!(leading_integer("RELEASE"), None);
    }

    #[test]
    fn repo_base_url_composes_triple_and_branch() {
        let abi = Abi::new("FreeBSD", "14", "amd64");
        assert_eq!(abi.triple(), "FreeBSD:14:amd64");
        assert_eq!(
            abi.repo_base_url(),
            "https://pkg.FreeBSD.org/FreeBSD:14:amd64/quarterly/All"
        );
    }
}
