//! File generation from template pairs.
//!
//! A template pair is a control document (`<name>.json`) plus a body
//! template (`<name>.tmpl`) in the project's template folder. The control
//! document declares substitutable variables as empty top-level string keys
//! and configures generation through `config.`-prefixed keys. Generation
//! runs the resolver over the document, then dispatches on `config.type`:
//! `single` materializes one output file, `collection` fans out to nested
//! jobs (which may themselves be collections) and aborts on the first
//! failure.

pub mod document;
pub mod materialize;
pub mod overlay;
pub mod resolver;

pub use overlay::Overlay;
pub use resolver::Resolver;

use crate::context::ProjectContext;
use crate::error::{Result, SproutError};
use document::{
    CONFIG_COLLECTION, CONFIG_OUTPUT, CONFIG_PARSE, CONFIG_TYPE, TYPE_COLLECTION, TYPE_SINGLE,
    Table,
};
use serde_json::Value;
use std::path::PathBuf;

/// Runs generation jobs against one project context.
pub struct Generator<'a> {
    ctx: &'a ProjectContext,
    resolver: Resolver,
}

impl<'a> Generator<'a> {
    /// Create a generator with the default resolution bound.
    pub fn new(ctx: &'a ProjectContext) -> Self {
        Self::with_resolver(ctx, Resolver::default())
    }

    /// Create a generator with an explicit resolver.
    pub fn with_resolver(ctx: &'a ProjectContext, resolver: Resolver) -> Self {
        Self { ctx, resolver }
    }

    /// Run one generation job, root of a possibly nested tree.
    ///
    /// Returns the output files created, in creation order. Any failure
    /// aborts the whole run; a half-generated tree is worse than a fully
    /// aborted one, so sibling jobs are not attempted after an error.
    pub fn run(&self, name: &str, overlay: &Overlay) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        self.run_job(name, overlay, &mut created)?;
        Ok(created)
    }

    /// Load, resolve, and dispatch a single named job.
    fn run_job(&self, name: &str, overlay: &Overlay, created: &mut Vec<PathBuf>) -> Result<()> {
        let mut doc = document::load(self.ctx.control_path(name))?;
        let resolved = self.resolver.resolve(&mut doc, overlay)?;
        self.dispatch(&resolved, name, created)
    }

    /// Route a resolved document based on `config.type`.
    fn dispatch(&self, resolved: &Table, name: &str, created: &mut Vec<PathBuf>) -> Result<()> {
        let config_type = resolved
            .get(CONFIG_TYPE)
            .ok_or_else(|| SproutError::MissingControlKey(CONFIG_TYPE.to_string()))?;

        match config_type {
            Value::String(t) if t == TYPE_SINGLE => self.single(resolved, name, created),
            Value::String(t) if t == TYPE_COLLECTION => self.collection(resolved, created),
            other => Err(SproutError::UnsupportedConfigType(document::stringify(
                other,
            ))),
        }
    }

    /// Materialize one output file from this job's body template.
    fn single(&self, resolved: &Table, name: &str, created: &mut Vec<PathBuf>) -> Result<()> {
        let output = resolved
            .get(CONFIG_OUTPUT)
            .ok_or_else(|| SproutError::MissingControlKey(CONFIG_OUTPUT.to_string()))?;
        let output = self.ctx.output_path(&document::stringify(output));

        let parse = resolved.get(CONFIG_PARSE).map_or(true, parse_flag);

        let path = materialize::materialize(&self.ctx.body_path(name), resolved, &output, parse)?;
        created.push(path);
        Ok(())
    }

    /// Recurse into every nested job named by `config.collection`.
    fn collection(&self, resolved: &Table, created: &mut Vec<PathBuf>) -> Result<()> {
        let entries = match resolved.get(CONFIG_COLLECTION) {
            None => return Err(SproutError::MissingControlKey(CONFIG_COLLECTION.to_string())),
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(SproutError::MalformedControlKey {
                    key: CONFIG_COLLECTION.to_string(),
                    detail: format!("expected a list, found {}", document::kind(other)),
                });
            }
        };

        for (index, entry) in entries.iter().enumerate() {
            let Value::Object(jobs) = entry else {
                return Err(SproutError::MalformedControlKey {
                    key: CONFIG_COLLECTION.to_string(),
                    detail: format!("entry {} is not a map of job name to arguments", index),
                });
            };

            for (nested_name, nested_args) in jobs {
                let Value::Object(args) = nested_args else {
                    return Err(SproutError::MalformedControlKey {
                        key: CONFIG_COLLECTION.to_string(),
                        detail: format!(
                            "arguments for '{}' at entry {} are not a map",
                            nested_name, index
                        ),
                    });
                };

                let overlay: Overlay = args
                    .iter()
                    .map(|(key, value)| (key.clone(), document::stringify(value)))
                    .collect();

                self.run_job(nested_name, &overlay, created)?;
            }
        }

        Ok(())
    }
}

/// Interpret `config.parse`. The original round-tripped everything through
/// strings, so bool-ish strings are honored alongside real booleans; anything
/// unrecognized means parse.
fn parse_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "false" | "0" | "no"
        ),
        _ => true,
    }
}
