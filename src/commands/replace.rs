//! The `replace` command: replace matching text across files.

use crate::cli::ReplaceArgs;
use crate::error::Result;
use crate::search::{self, SearchOptions};

pub fn cmd_replace(args: ReplaceArgs) -> Result<()> {
    let opts = SearchOptions::new(&args.find, args.regex, &args.ext, args.recursive)?;

    let changed = search::replace(&args.folder, &opts, &args.replace, args.commit)?;

    for path in &changed {
        println!("{}", path);
    }

    if args.commit {
        println!("{} file(s) updated.", changed.len());
    } else if !changed.is_empty() {
        println!("Run again with --commit to write these changes.");
    }

    Ok(())
}
