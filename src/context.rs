//! Project context resolution for sprout.
//!
//! Every command that touches the filesystem anchors itself to a project via
//! the `SPROUT_CONFIG` environment variable, which must hold the path to the
//! project config file. The project root is the directory containing that
//! file; the template folder and all relative output paths derive from it.

use crate::error::{Result, SproutError};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable holding the project config file path.
pub const CONFIG_ENV: &str = "SPROUT_CONFIG";

/// Settings read from the project config file.
///
/// Unknown fields are ignored so the same file can carry unrelated project
/// configuration (session keys, application settings) without breaking
/// generation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Folder holding template pairs, relative to the project root.
    pub templates: String,

    /// Extension of control documents (no leading dot).
    pub control_extension: String,

    /// Extension of body templates (no leading dot).
    pub body_extension: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            templates: "templates".to_string(),
            control_extension: "json".to_string(),
            body_extension: "tmpl".to_string(),
        }
    }
}

/// Resolved paths and settings for one sprout invocation.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Absolute (or as-given) path to the project config file.
    pub config_path: PathBuf,

    /// Directory containing the config file; all relative paths hang off it.
    pub project_root: PathBuf,

    /// Parsed settings from the config file.
    pub config: ProjectConfig,
}

impl ProjectContext {
    /// Resolve the project context from the `SPROUT_CONFIG` environment
    /// variable.
    pub fn resolve() -> Result<Self> {
        let config_path = env::var(CONFIG_ENV).map_err(|_| {
            SproutError::Config(format!(
                "environment variable {CONFIG_ENV} needs to be set to the project config file location"
            ))
        })?;
        Self::resolve_from(config_path)
    }

    /// Resolve the project context from a known config file path.
    ///
    /// This is the entry point used by tests, which build their project
    /// layout inside a temp directory.
    pub fn resolve_from<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref().to_path_buf();

        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            SproutError::Config(format!(
                "the project config file '{}' cannot be read: {}",
                config_path.display(),
                e
            ))
        })?;

        let config: ProjectConfig = serde_json::from_str(&raw).map_err(|e| {
            SproutError::Config(format!(
                "the project config file '{}' cannot be parsed: {}",
                config_path.display(),
                e
            ))
        })?;

        let project_root = config_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();

        Ok(Self {
            config_path,
            project_root,
            config,
        })
    }

    /// Directory holding template pairs.
    pub fn template_dir(&self) -> PathBuf {
        self.project_root.join(&self.config.templates)
    }

    /// Path to the control document for a template pair name.
    pub fn control_path(&self, name: &str) -> PathBuf {
        self.template_dir()
            .join(format!("{}.{}", name, self.config.control_extension))
    }

    /// Path to the body template for a template pair name.
    pub fn body_path(&self, name: &str) -> PathBuf {
        self.template_dir()
            .join(format!("{}.{}", name, self.config.body_extension))
    }

    /// Resolve a generated-output path relative to the project root.
    pub fn output_path(&self, relative: &str) -> PathBuf {
        self.project_root.join(relative)
    }
}
