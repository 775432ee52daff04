//! Placeholder substitution engine.
//!
//! This is the substitution primitive used for control documents and body
//! templates. Syntax:
//!
//! - `{{name}}` substitutes the value of variable `name`
//! - whitespace inside the braces is trimmed, and one leading `.` is
//!   stripped, so templates written in the `{{.name}}` dialect keep working
//! - single braces are literal (serialized JSON is full of them)
//! - an unterminated `{{` renders literally
//!
//! A placeholder whose variable has no value renders as the [`NO_VALUE`]
//! sentinel rather than failing. The resolver relies on this: the sentinel is
//! how it detects which keys have not converged yet, and its presence in a
//! fully-rendered document is what drives another resolution pass.

use std::collections::HashMap;

/// Sentinel left in rendered text where a variable had no value.
pub const NO_VALUE: &str = "<no value>";

/// Render a template string by substituting `{{name}}` placeholders.
///
/// Missing variables become [`NO_VALUE`]; rendering itself never fails.
pub fn render(template: &str, variables: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];

        match after.find("}}") {
            Some(close) => {
                let raw = &after[..close];
                let name = raw.trim();
                let name = name.strip_prefix('.').unwrap_or(name).trim_start();

                if name.is_empty() {
                    // Not a placeholder; keep the braces literally.
                    out.push_str("{{");
                    out.push_str(raw);
                    out.push_str("}}");
                } else {
                    match variables.get(name) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(NO_VALUE),
                    }
                }

                rest = &after[close + 2..];
            }
            None => {
                // Unterminated open marker; emit the remainder untouched.
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Helper to create a variables map from a list of key-value pairs.
#[cfg(test)]
pub fn vars<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
