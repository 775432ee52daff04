//! CLI argument parsing for sprout.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Sprout: generate project files from template pairs.
///
/// A template pair is a control document (`<name>.json`) describing
/// variables and output rules, plus a body template (`<name>.tmpl`) whose
/// content is emitted with those variables substituted. The project is
/// located through the `SPROUT_CONFIG` environment variable, which points to
/// the project config file; relative paths hang off that file's directory.
#[derive(Parser, Debug)]
#[command(name = "sprout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for sprout.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate files from a template pair.
    ///
    /// Every top-level key with an empty value in the control document must
    /// be supplied as a `key:value` argument. Keys resolved by the document
    /// itself (such as `config.output`) may also be overridden this way.
    Generate(GenerateArgs),

    /// Manage body templates.
    Template(TemplateCommand),

    /// Manage the project config file and its session keys.
    Env(EnvCommand),

    /// Search for files containing matching text.
    Find(FindArgs),

    /// Search for matching text and replace it with new text.
    ///
    /// Dry-run by default; pass --commit to write the changes.
    Replace(ReplaceArgs),
}

/// Arguments for the `generate` command.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Template pair name, folder-qualified, without an extension
    /// (e.g. model/default).
    pub name: String,

    /// key:value pairs, one for every empty key in the control document.
    pub vars: Vec<String>,
}

/// Template subcommands.
#[derive(Parser, Debug)]
pub struct TemplateCommand {
    #[command(subcommand)]
    pub action: TemplateAction,
}

/// Available template actions.
#[derive(Subcommand, Debug)]
pub enum TemplateAction {
    /// Create a new body template skeleton in the template folder.
    ///
    /// Directories in the name are created automatically. An existing
    /// template with the same name is overwritten.
    Make(TemplateMakeArgs),
}

/// Arguments for the `template make` command.
#[derive(Parser, Debug)]
pub struct TemplateMakeArgs {
    /// Template name without an extension (e.g. model/default).
    pub name: String,
}

/// Env subcommands.
#[derive(Parser, Debug)]
pub struct EnvCommand {
    #[command(subcommand)]
    pub action: EnvAction,
}

/// Available env actions.
#[derive(Subcommand, Debug)]
pub enum EnvAction {
    /// Create sprout.json from sprout.json.example with fresh session keys.
    Make,

    /// Print a new set of session keys.
    Keyshow,

    /// Update the project config file with a new set of session keys.
    Keyupdate,
}

/// Arguments for the `find` command.
#[derive(Parser, Debug)]
pub struct FindArgs {
    /// Folder to search.
    pub folder: PathBuf,

    /// Case-sensitive text to find.
    pub text: String,

    /// File name pattern to search in (e.g. *.rs).
    #[arg(long, default_value = "*")]
    pub ext: String,

    /// Treat the text as a regular expression.
    #[arg(long)]
    pub regex: bool,

    /// Search subfolders.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub recursive: bool,
}

/// Arguments for the `replace` command.
#[derive(Parser, Debug)]
pub struct ReplaceArgs {
    /// Folder to search.
    pub folder: PathBuf,

    /// Case-sensitive text to replace.
    pub find: String,

    /// Text to replace it with.
    pub replace: String,

    /// File name pattern to search in (e.g. *.rs).
    #[arg(long, default_value = "*")]
    pub ext: String,

    /// Treat the search text as a regular expression.
    #[arg(long)]
    pub regex: bool,

    /// Search subfolders.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub recursive: bool,

    /// Write the changes instead of only listing affected files.
    #[arg(long)]
    pub commit: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_minimal() {
        let cli = Cli::try_parse_from(["sprout", "generate", "model/default"]).unwrap();
        if let Command::Generate(args) = cli.command {
            assert_eq!(args.name, "model/default");
            assert!(args.vars.is_empty());
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn parse_generate_with_vars() {
        let cli = Cli::try_parse_from([
            "sprout",
            "generate",
            "model/default",
            "package:car",
            "table:cars",
        ])
        .unwrap();
        if let Command::Generate(args) = cli.command {
            assert_eq!(args.name, "model/default");
            assert_eq!(args.vars, vec!["package:car", "table:cars"]);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn parse_generate_requires_name() {
        assert!(Cli::try_parse_from(["sprout", "generate"]).is_err());
    }

    #[test]
    fn parse_template_make() {
        let cli = Cli::try_parse_from(["sprout", "template", "make", "view/login"]).unwrap();
        if let Command::Template(cmd) = cli.command {
            let TemplateAction::Make(args) = cmd.action;
            assert_eq!(args.name, "view/login");
        } else {
            panic!("Expected Template command");
        }
    }

    #[test]
    fn parse_env_actions() {
        let cli = Cli::try_parse_from(["sprout", "env", "make"]).unwrap();
        if let Command::Env(cmd) = cli.command {
            assert!(matches!(cmd.action, EnvAction::Make));
        } else {
            panic!("Expected Env command");
        }

        let cli = Cli::try_parse_from(["sprout", "env", "keyshow"]).unwrap();
        if let Command::Env(cmd) = cli.command {
            assert!(matches!(cmd.action, EnvAction::Keyshow));
        } else {
            panic!("Expected Env command");
        }

        let cli = Cli::try_parse_from(["sprout", "env", "keyupdate"]).unwrap();
        if let Command::Env(cmd) = cli.command {
            assert!(matches!(cmd.action, EnvAction::Keyupdate));
        } else {
            panic!("Expected Env command");
        }
    }

    #[test]
    fn parse_find_defaults() {
        let cli = Cli::try_parse_from(["sprout", "find", "src", "TODO"]).unwrap();
        if let Command::Find(args) = cli.command {
            assert_eq!(args.folder, PathBuf::from("src"));
            assert_eq!(args.text, "TODO");
            assert_eq!(args.ext, "*");
            assert!(!args.regex);
            assert!(args.recursive);
        } else {
            panic!("Expected Find command");
        }
    }

    #[test]
    fn parse_find_flags() {
        let cli = Cli::try_parse_from([
            "sprout",
            "find",
            "src",
            r"fn \w+",
            "--ext",
            "*.rs",
            "--regex",
            "--recursive=false",
        ])
        .unwrap();
        if let Command::Find(args) = cli.command {
            assert_eq!(args.ext, "*.rs");
            assert!(args.regex);
            assert!(!args.recursive);
        } else {
            panic!("Expected Find command");
        }
    }

    #[test]
    fn parse_replace_is_dry_run_by_default() {
        let cli = Cli::try_parse_from(["sprout", "replace", "src", "old", "new"]).unwrap();
        if let Command::Replace(args) = cli.command {
            assert_eq!(args.find, "old");
            assert_eq!(args.replace, "new");
            assert!(!args.commit);
        } else {
            panic!("Expected Replace command");
        }
    }

    #[test]
    fn parse_replace_commit() {
        let cli =
            Cli::try_parse_from(["sprout", "replace", "src", "old", "new", "--commit"]).unwrap();
        if let Command::Replace(args) = cli.command {
            assert!(args.commit);
        } else {
            panic!("Expected Replace command");
        }
    }
}
