//! Component C: the Archive Extractor. Decompresses and unpacks a
//! `zstd`-compressed tar stream into a target directory.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

/// Extract a `zstd`-compressed tar archive at `source_path` into `dest_dir`.
///
/// Relative paths and permissions are preserved; symlinks in the archive
/// are recreated. Every entry path is checked against a path-traversal
/// guard before being written: an entry whose resolved path would land
/// outside `dest_dir` aborts the whole extraction.
///
/// # Errors
///
/// Returns [`EngineError::Archive`] if the source cannot be opened, the
/// `zstd` framing is unrecognized, the stream is truncated, or any entry
/// would escape `dest_dir`.
pub fn extract(source_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = File::open(source_path)
        .map_err(|e| EngineError::Archive(format!("cannot open {}: {e}", source_path.display())))?;

    let decoder = zstd::stream::Decoder::new(file)
        .map_err(|e| EngineError::Archive(format!("not a zstd stream: {e}")))?;

    std::fs::create_dir_all(dest_dir).map_err(|e| crate::error::fs_err(dest_dir, e))?;

    let mut archive = tar::Archive::new(decoder);
    archive.set_preserve_permissions(true);

    let entries = archive
        .entries()
        .map_err(|e| EngineError::Archive(format!("truncated or corrupt tar stream: {e}")))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| EngineError::Archive(format!("corrupt tar entry: {e}")))?;
        let rel_path = entry
            .path()
            .map_err(|e| EngineError::Archive(format!("invalid entry path: {e}")))?
            .into_owned();

        let dest_path = guarded_join(dest_dir, &rel_path)?;

        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| crate::error::fs_err(parent, e))?;
        }

        entry
            .unpack(&dest_path)
            .map_err(|e| EngineError::Archive(format!("failed to write {}: {e}", dest_path.display())))?;
    }

    Ok(())
}

/// Join `dest_dir` and `rel_path`, rejecting any entry that would land
/// outside `dest_dir` after normalizing `..` components.
///
/// This is a lexical check (it does not require the path to exist yet),
/// which is what we need during extraction: the destination tree is being
/// created as we go.
fn guarded_join(dest_dir: &Path, rel_path: &Path) -> Result<PathBuf> {
    if rel_path.is_absolute() {
        return Err(EngineError::Archive(format!(
            "archive entry has an absolute path: {}",
            rel_path.display()
        )));
    }

    let mut depth: i64 = 0;
    for component in rel_path.components() {
        match component {
            std::path::Component::ParentDir => depth -= 1,
            std::path::Component::Normal(_) => depth += 1,
            std::path::Component::CurDir => {}
            other => {
                return Err(EngineError::Archive(format!(
                    "archive entry has a disallowed path component: {other:?}"
                )));
            }
        }
        if depth < 0 {
            return Err(EngineError::Archive(format!(
                "archive entry escapes destination directory: {}",
                rel_path.display()
            )));
        }
    }

    Ok(dest_dir.join(rel_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_archive(entries: &[(&str, &[u8])]) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        let encoder = zstd::stream::Encoder::new(file.reopen().unwrap(), 0).unwrap();
        let mut builder = tar::Builder::new(encoder);
        for (name, contents) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *contents).unwrap();
        }
        let encoder = builder.into_inner().unwrap();
        encoder.finish().unwrap().flush().unwrap();
        file
    }

    #[test]
    fn extracts_regular_files_preserving_relative_paths() {
        let archive = build_archive(&[
            ("+MANIFEST", b"{}"),
            ("usr/local/bin/hello", b"#!/bin/sh\necho hi\n"),
        ]);
        let dest = tempfile::tempdir().unwrap();

        extract(archive.path(), dest.path()).unwrap();

        assert_eq!(
            std::fs::read_to_string(dest.path().join("usr/local/bin/hello")).unwrap(),
            "#!/bin/sh\necho hi\n"
        );
        assert_eq!(std::fs::read_to_string(dest.path().join("+MANIFEST")).unwrap(), "{}");
    }

    #[test]
    fn rejects_path_traversal_entries() {
        let archive = build_archive(&[("../../etc/passwd", b"pwned")]);
        let dest = tempfile::tempdir().unwrap();

        let err = extract(archive.path(), dest.path());
        assert!(err.is_err());
        assert!(!dest.path().parent().unwrap().join("etc/passwd").exists());
    }

    #[test]
    fn rejects_absolute_path_entries() {
        let archive = build_archive(&[("/etc/passwd", b"pwned")]);
        let dest = tempfile::tempdir().unwrap();
        assert!(extract(archive.path(), dest.path()).is_err());
    }

    #[test]
    fn fails_on_truncated_stream() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not a real zstd stream").unwrap();
        let dest = tempfile::tempdir().unwrap();
        assert!(extract(file.path(), dest.path()).is_err());
    }
}
