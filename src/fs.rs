//! Filesystem helpers for sprout.
//!
//! Generated output is written with a no-clobber guarantee: an existing file
//! is never truncated or replaced, and a failed run never leaves a partial
//! output file behind. Writes go to a temporary file in the target directory
//! first, are synced, and are then moved into place.

use crate::error::{Result, SproutError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Returns true if the file or folder exists.
pub fn exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().symlink_metadata().is_ok()
}

/// Write bytes to a path that must not already exist.
///
/// Creates missing parent directories. The content lands in a temporary file
/// first and is renamed into place, so the target either appears complete or
/// not at all.
pub fn write_new<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if exists(path) {
        return Err(SproutError::AlreadyExists(path.to_path_buf()));
    }

    ensure_parent(path)?;
    let temp_path = temp_path(path)?;
    write_and_sync(&temp_path, content)?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        SproutError::Io(format!(
            "failed to move '{}' into place: {}",
            path.display(),
            e
        ))
    })
}

/// Copy a file to a destination that must not already exist.
pub fn copy_new<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<()> {
    let src = src.as_ref();

    let data = fs::read(src).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SproutError::NotFound(src.to_path_buf()),
        _ => SproutError::Io(format!("failed to read '{}': {}", src.display(), e)),
    })?;

    write_new(dst, &data)
}

/// Atomically replace the contents of an existing (or new) file.
///
/// Used by the `replace` command, the one place where rewriting in place is
/// the whole point. The temp-then-rename dance keeps the file from ever being
/// observed half-written.
pub fn atomic_overwrite<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    ensure_parent(path)?;
    let temp_path = temp_path(path)?;
    write_and_sync(&temp_path, content)?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        SproutError::Io(format!(
            "failed to atomically replace '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Create the parent directory of a target path if it is missing.
fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            SproutError::Io(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }
    Ok(())
}

/// Generate a temporary file path in the same directory as the target.
fn temp_path(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SproutError::Io(format!("invalid file path: {}", target.display())))?;

    Ok(parent.join(format!(".{}.tmp", filename)))
}

/// Write content to a file and sync it to disk.
fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        SproutError::Io(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.write_all(content).map_err(|e| {
        let _ = fs::remove_file(path);
        SproutError::Io(format!("failed to write to temporary file: {}", e))
    })?;

    file.sync_all().map_err(|e| {
        let _ = fs::remove_file(path);
        SproutError::Io(format!("failed to sync temporary file to disk: {}", e))
    })?;

    Ok(())
}
