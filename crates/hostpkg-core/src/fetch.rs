//! Component B: the Fetcher. Downloads a URL to a local path, atomically.

use std::io::Write;
use std::path::Path;

use crate::error::{EngineError, Result};

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("hostpkg/", env!("CARGO_PKG_VERSION"));

/// Build the blocking HTTP client used for every fetch in a process.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn client() -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|source| EngineError::Network {
            url: String::new(),
            source,
        })
}

/// Download `url`'s full body to `dest`.
///
/// The body is written to a sibling temporary file first and renamed into
/// place on success, so that on any error `dest` is left untouched (it
/// either doesn't exist yet, or still holds whatever was there before).
///
/// # Errors
///
/// Returns [`EngineError::Network`] if the request fails or returns a
/// non-success status, or [`EngineError::Filesystem`] if the temporary file
/// cannot be written or renamed.
pub fn fetch(client: &reqwest::blocking::Client, url: &str, dest: &Path) -> Result<()> {
    tracing::debug!(url, dest = %dest.display(), "fetching");

    let mut response = client
        .get(url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|source| EngineError::Network {
            url: url.to_string(),
            source,
        })?;

    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| crate::error::fs_err(parent, e))?;

    let tmp_path = parent.join(format!(
        ".{}.part",
        dest.file_name().and_then(|n| n.to_str()).unwrap_or("download")
    ));

    {
        let mut tmp_file =
            std::fs::File::create(&tmp_path).map_err(|e| crate::error::fs_err(&tmp_path, e))?;
        response
            .copy_to(&mut tmp_file)
            .map_err(|source| EngineError::Network {
                url: url.to_string(),
                source,
            })?;
        tmp_file.flush().map_err(|e| crate::error::fs_err(&tmp_path, e))?;
    }

    std::fs::rename(&tmp_path, dest).map_err(|e| crate::error::fs_err(dest, e))?;
    tracing::debug!(dest = %dest.display(), "fetch complete");
    Ok(())
}
