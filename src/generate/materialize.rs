//! Output materialization.
//!
//! The last stage of a generation job: apply the body template (or copy it
//! verbatim) against the resolved variables and write exactly one new file.
//! The rendered content is produced fully in memory before the output path
//! is touched, and the write itself refuses to clobber existing files.

use crate::error::{Result, SproutError};
use crate::generate::document::{self, Table};
use crate::template;
use std::fs;
use std::path::{Path, PathBuf};

/// Write one generated file from a body template.
///
/// `output` must not exist; missing intermediate directories are created.
/// When `parse` is false the body bytes are copied verbatim, with no
/// substitution attempted. Returns the created path for reporting.
pub fn materialize(
    body_path: &Path,
    variables: &Table,
    output: &Path,
    parse: bool,
) -> Result<PathBuf> {
    if crate::fs::exists(output) {
        return Err(SproutError::AlreadyExists(output.to_path_buf()));
    }

    let content = if parse {
        let body = read_body_text(body_path)?;
        template::render(&body, &document::string_variables(variables)).into_bytes()
    } else {
        read_body_bytes(body_path)?
    };

    crate::fs::write_new(output, &content)?;
    Ok(output.to_path_buf())
}

fn read_body_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SproutError::NotFound(path.to_path_buf()),
        _ => SproutError::Io(format!("failed to read '{}': {}", path.display(), e)),
    })
}

fn read_body_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SproutError::NotFound(path.to_path_buf()),
        _ => SproutError::Io(format!("failed to read '{}': {}", path.display(), e)),
    })
}
