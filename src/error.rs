//! Error types for the sprout CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error
//! messages: every variant carries the key name, file path, or value the
//! user needs to fix the control document without re-running with extra
//! diagnostics.

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sprout operations.
///
/// Each variant maps to an exit code via [`SproutError::exit_code`]. All
/// errors are terminal for the job that raised them; there is no partial
/// recovery or retry.
#[derive(Error, Debug)]
pub enum SproutError {
    /// A control or body file (or any other required file) is absent.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A command-line variable was not in `key:value` form.
    #[error("argument is not in key:value form: '{0}'")]
    MalformedArgument(String),

    /// A control document could not be parsed into a key/value tree.
    #[error("control document '{}' is malformed: {detail}", .path.display())]
    MalformedDocument { path: PathBuf, detail: String },

    /// A control key exists but its value has the wrong shape.
    #[error("control key '{key}' is not in the correct format: {detail}")]
    MalformedControlKey { key: String, detail: String },

    /// A required control key is absent from the resolved document.
    #[error("key '{0}' is missing from the control document")]
    MissingControlKey(String),

    /// `config.type` resolved to something other than the known values.
    #[error("value '{0}' for key 'config.type' is not supported")]
    UnsupportedConfigType(String),

    /// A declared-empty key was never supplied by the caller.
    #[error("variable missing: {0}")]
    MissingVariable(String),

    /// The iteration bound was exceeded; names every key that never converged.
    #[error("check these keys for variable mistakes: {}", .0.join(", "))]
    UnresolvedVariables(Vec<String>),

    /// The document no longer parsed after a substitution pass. This is an
    /// internal invariant violation, not a user mistake.
    #[error("document no longer parses after substitution: {0}")]
    CorruptIntermediateState(String),

    /// The output path is already occupied; generation never overwrites.
    #[error("cannot generate because file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// The environment or project config file is missing or invalid.
    #[error("{0}")]
    Config(String),

    /// Any other I/O failure, with the path baked into the message.
    #[error("{0}")]
    Io(String),
}

impl SproutError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SproutError::MalformedArgument(_) | SproutError::Config(_) => exit_codes::USER_ERROR,
            SproutError::MalformedDocument { .. }
            | SproutError::MalformedControlKey { .. }
            | SproutError::MissingControlKey(_)
            | SproutError::UnsupportedConfigType(_)
            | SproutError::MissingVariable(_)
            | SproutError::UnresolvedVariables(_)
            | SproutError::CorruptIntermediateState(_) => exit_codes::GENERATION_FAILURE,
            SproutError::NotFound(_) | SproutError::AlreadyExists(_) | SproutError::Io(_) => {
                exit_codes::FS_FAILURE
            }
        }
    }
}

/// Result type alias for sprout operations.
pub type Result<T> = std::result::Result<T, SproutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_have_user_exit_code() {
        let err = SproutError::MalformedArgument("package".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);

        let err = SproutError::Config("SPROUT_CONFIG not set".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn resolution_errors_have_generation_exit_code() {
        let err = SproutError::MissingVariable("package".to_string());
        assert_eq!(err.exit_code(), exit_codes::GENERATION_FAILURE);

        let err = SproutError::UnresolvedVariables(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.exit_code(), exit_codes::GENERATION_FAILURE);

        let err = SproutError::UnsupportedConfigType("batch".to_string());
        assert_eq!(err.exit_code(), exit_codes::GENERATION_FAILURE);
    }

    #[test]
    fn filesystem_errors_have_fs_exit_code() {
        let err = SproutError::AlreadyExists(PathBuf::from("model/car.rs"));
        assert_eq!(err.exit_code(), exit_codes::FS_FAILURE);

        let err = SproutError::NotFound(PathBuf::from("templates/model/default.json"));
        assert_eq!(err.exit_code(), exit_codes::FS_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = SproutError::MalformedArgument("package".to_string());
        assert_eq!(err.to_string(), "argument is not in key:value form: 'package'");

        let err = SproutError::UnresolvedVariables(vec!["output".to_string(), "table".to_string()]);
        assert_eq!(
            err.to_string(),
            "check these keys for variable mistakes: output, table"
        );

        let err = SproutError::MissingControlKey("config.type".to_string());
        assert_eq!(
            err.to_string(),
            "key 'config.type' is missing from the control document"
        );
    }
}
