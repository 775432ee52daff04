//! The `template make` command: create a body template skeleton.

use crate::cli::TemplateMakeArgs;
use crate::context::ProjectContext;
use crate::error::Result;

/// Starter content for a fresh body template.
const TEMPLATE_SKELETON: &str = "\
// New body template. Placeholders use {{name}} and are filled from the
// control document when `sprout generate` runs.
";

pub fn cmd_make(args: TemplateMakeArgs) -> Result<()> {
    let ctx = ProjectContext::resolve()?;
    let path = ctx.body_path(&args.name);

    // Unlike generated output, templates may be re-made over an existing
    // file; the overwrite is the point of the command.
    crate::fs::atomic_overwrite(&path, TEMPLATE_SKELETON.as_bytes())?;

    println!("Template created: {}", path.display());
    Ok(())
}
