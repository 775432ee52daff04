//! The `generate` command: run a generation job from a template pair.

use crate::cli::GenerateArgs;
use crate::context::ProjectContext;
use crate::error::Result;
use crate::generate::{Generator, overlay};

pub fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let ctx = ProjectContext::resolve()?;
    let overlay = overlay::from_args(&args.vars)?;

    let created = Generator::new(&ctx).run(&args.name, &overlay)?;

    for path in created {
        println!("Code generated: {}", path.display());
    }

    Ok(())
}
