//! Text search and replacement across project files.
//!
//! Backs the `find` and `replace` commands: walk a folder (recursively by
//! default), filter files by a name glob, and match lines either literally
//! or with a regular expression. Files that are not valid UTF-8 are skipped;
//! this tool does not touch binary files.

use crate::error::{Result, SproutError};
use globset::{Glob, GlobMatcher};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// How text is matched: verbatim or as a regular expression.
#[derive(Debug)]
pub enum Matcher {
    Literal(String),
    Pattern(Regex),
}

impl Matcher {
    /// Build a matcher; `use_regex` selects the pattern form.
    pub fn new(text: &str, use_regex: bool) -> Result<Self> {
        if use_regex {
            let re = Regex::new(text).map_err(|e| {
                SproutError::Config(format!("invalid regular expression '{}': {}", text, e))
            })?;
            Ok(Self::Pattern(re))
        } else {
            Ok(Self::Literal(text.to_string()))
        }
    }

    fn is_match(&self, line: &str) -> bool {
        match self {
            Matcher::Literal(text) => line.contains(text),
            Matcher::Pattern(re) => re.is_match(line),
        }
    }

    fn replace_all(&self, text: &str, replacement: &str) -> String {
        match self {
            Matcher::Literal(find) => text.replace(find, replacement),
            Matcher::Pattern(re) => re.replace_all(text, replacement).into_owned(),
        }
    }
}

/// Options shared by `find` and `replace`.
#[derive(Debug)]
pub struct SearchOptions {
    matcher: Matcher,
    file_glob: GlobMatcher,
    recursive: bool,
}

impl SearchOptions {
    pub fn new(text: &str, use_regex: bool, file_pattern: &str, recursive: bool) -> Result<Self> {
        let file_glob = Glob::new(file_pattern)
            .map_err(|e| {
                SproutError::Config(format!(
                    "invalid file pattern '{}': {}",
                    file_pattern, e
                ))
            })?
            .compile_matcher();

        Ok(Self {
            matcher: Matcher::new(text, use_regex)?,
            file_glob,
            recursive,
        })
    }
}

/// Search a folder, returning one `path:line: text` entry per matching line.
pub fn find(folder: &Path, opts: &SearchOptions) -> Result<Vec<String>> {
    let mut results = Vec::new();

    walk(folder, opts, &mut |path, contents| {
        for (number, line) in contents.lines().enumerate() {
            if opts.matcher.is_match(line) {
                results.push(format!("{}:{}: {}", path.display(), number + 1, line.trim()));
            }
        }
        Ok(())
    })?;

    Ok(results)
}

/// Replace matching text in every file under a folder.
///
/// Returns the paths whose contents would change. Files are rewritten (via
/// atomic overwrite) only when `commit` is true; otherwise this is a dry run.
pub fn replace(
    folder: &Path,
    opts: &SearchOptions,
    replacement: &str,
    commit: bool,
) -> Result<Vec<String>> {
    let mut changed = Vec::new();
    let mut pending: Vec<(PathBuf, String)> = Vec::new();

    walk(folder, opts, &mut |path, contents| {
        let updated = opts.matcher.replace_all(contents, replacement);
        if updated != contents {
            changed.push(path.display().to_string());
            if commit {
                pending.push((path.to_path_buf(), updated));
            }
        }
        Ok(())
    })?;

    for (path, contents) in pending {
        crate::fs::atomic_overwrite(&path, contents.as_bytes())?;
    }

    Ok(changed)
}

/// Visit every readable text file under `folder` that matches the file glob.
///
/// Symlinks are never followed; a link pointing back into the tree would
/// otherwise recurse without bound.
fn walk(
    folder: &Path,
    opts: &SearchOptions,
    visit: &mut dyn FnMut(&Path, &str) -> Result<()>,
) -> Result<()> {
    if !folder.is_dir() {
        return Err(SproutError::NotFound(folder.to_path_buf()));
    }

    let entries = fs::read_dir(folder).map_err(|e| {
        SproutError::Io(format!("failed to read '{}': {}", folder.display(), e))
    })?;

    // Sort for deterministic output across platforms.
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| SproutError::Io(format!("failed to read '{}': {}", folder.display(), e)))?;
        paths.push(entry.path());
    }
    paths.sort();

    for path in paths {
        let Ok(meta) = path.symlink_metadata() else {
            continue;
        };
        if meta.file_type().is_symlink() {
            continue;
        }
        if meta.is_dir() {
            let hidden_vcs = path
                .file_name()
                .is_some_and(|n| n == std::ffi::OsStr::new(".git"));
            if opts.recursive && !hidden_vcs {
                walk(&path, opts, visit)?;
            }
        } else if let Some(name) = path.file_name() {
            if opts.file_glob.is_match(Path::new(name)) {
                // Binary and other non-UTF-8 files are skipped silently.
                if let Ok(contents) = fs::read_to_string(&path) {
                    visit(&path, &contents)?;
                }
            }
        }
    }

    Ok(())
}
