//! Command implementations for sprout.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Handlers are thin: they resolve the project context,
//! call into the core modules, and print results.

mod env;
mod find;
mod generate;
mod replace;
mod template_cmd;

use crate::cli::{Command, EnvAction, TemplateAction};
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Generate(args) => generate::cmd_generate(args),
        Command::Template(cmd) => match cmd.action {
            TemplateAction::Make(args) => template_cmd::cmd_make(args),
        },
        Command::Env(cmd) => match cmd.action {
            EnvAction::Make => env::cmd_make(),
            EnvAction::Keyshow => env::cmd_keyshow(),
            EnvAction::Keyupdate => env::cmd_keyupdate(),
        },
        Command::Find(args) => find::cmd_find(args),
        Command::Replace(args) => replace::cmd_replace(args),
    }
}
