//! The `find` command: search files for matching text.

use crate::cli::FindArgs;
use crate::error::Result;
use crate::search::{self, SearchOptions};

pub fn cmd_find(args: FindArgs) -> Result<()> {
    let opts = SearchOptions::new(&args.text, args.regex, &args.ext, args.recursive)?;

    for line in search::find(&args.folder, &opts)? {
        println!("{}", line);
    }

    Ok(())
}
