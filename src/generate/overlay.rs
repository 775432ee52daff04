//! Argument overlay builder.
//!
//! Turns the trailing `key:value` arguments of `sprout generate` into the
//! overlay map consumed by the resolver. Values are taken verbatim after the
//! first `:`, so values themselves may contain colons.

use crate::error::{Result, SproutError};
use std::collections::BTreeMap;

/// Caller-supplied arguments for one generation job.
///
/// A `BTreeMap` keeps iteration order deterministic, which keeps seeding and
/// overlay injection reproducible across runs.
pub type Overlay = BTreeMap<String, String>;

/// Build an overlay from a list of `key:value` tokens.
///
/// The last value wins when a key appears more than once. A token without a
/// `:` separator fails with [`SproutError::MalformedArgument`], naming the
/// offending token.
pub fn from_args(args: &[String]) -> Result<Overlay> {
    let mut overlay = Overlay::new();

    for arg in args {
        match arg.split_once(':') {
            Some((key, value)) => {
                overlay.insert(key.to_string(), value.to_string());
            }
            None => return Err(SproutError::MalformedArgument(arg.clone())),
        }
    }

    Ok(overlay)
}
