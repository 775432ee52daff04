//! Control document loading.
//!
//! A control document is the JSON half of a template pair: an object whose
//! top-level empty string keys declare substitutable variables and whose
//! `config.`-prefixed keys configure generation itself.

use crate::error::{Result, SproutError};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Untyped key/value tree of a control document.
pub type Table = serde_json::Map<String, Value>;

/// Namespace prefix of reserved control keys.
pub const CONFIG_PREFIX: &str = "config.";

/// Required; selects between single-file and collection generation.
pub const CONFIG_TYPE: &str = "config.type";

/// Required for `single`; relative output path, may embed placeholders.
pub const CONFIG_OUTPUT: &str = "config.output";

/// Optional; when false the body is copied verbatim.
pub const CONFIG_PARSE: &str = "config.parse";

/// Required for `collection`; list of nested job entries.
pub const CONFIG_COLLECTION: &str = "config.collection";

/// `config.type` value for one template pair producing one file.
pub const TYPE_SINGLE: &str = "single";

/// `config.type` value for a document that fans out to nested jobs.
pub const TYPE_COLLECTION: &str = "collection";

/// Load a control document from disk into an untyped tree.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();

    let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SproutError::NotFound(path.to_path_buf()),
        _ => SproutError::Io(format!("failed to read '{}': {}", path.display(), e)),
    })?;

    let value: Value = serde_json::from_str(&raw).map_err(|e| SproutError::MalformedDocument {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    match value {
        Value::Object(table) => Ok(table),
        other => Err(SproutError::MalformedDocument {
            path: path.to_path_buf(),
            detail: format!("expected an object at the top level, found {}", kind(&other)),
        }),
    }
}

/// Human-readable name for a JSON value's shape.
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}

/// Flatten a value to the string form used for substitution and reporting.
///
/// Strings are used as-is; anything else renders as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Project a variable table down to the string map the template engine takes.
pub fn string_variables(table: &Table) -> HashMap<String, String> {
    table
        .iter()
        .map(|(key, value)| (key.clone(), stringify(value)))
        .collect()
}
