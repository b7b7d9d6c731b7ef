//! The advisory cross-invocation lock described in §5: a plain
//! `create_new` file at `prefix/tmp/.lock`, held for the lifetime of one
//! command and removed on drop.

use std::path::PathBuf;

use crate::error::{EngineError, Result};
use crate::paths;

/// A held advisory lock. Dropping it removes the lock file.
#[derive(Debug)]
pub struct PrefixLock {
    path: PathBuf,
}

impl PrefixLock {
    /// Acquire the prefix lock, creating `prefix/tmp/` if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Busy`] if the lock file already exists, or a
    /// filesystem error if `prefix/tmp/` cannot be created.
    pub fn acquire() -> Result<Self> {
        std::fs::create_dir_all(paths::tmp_dir()).map_err(|e| crate::error::fs_err(paths::tmp_dir(), e))?;

        let path = paths::lock_path();
        match std::fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(Self { path }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Err(EngineError::Busy),
            Err(e) => Err(crate::error::fs_err(&path, e)),
        }
    }
}

impl Drop for PrefixLock {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), %err, "failed to remove prefix lock on drop");
        }
    }
}
