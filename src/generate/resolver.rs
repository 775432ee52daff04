//! Bounded fixed-point variable resolution.
//!
//! Control documents reference their own keys: an output path template can
//! interpolate a `package` variable that is itself resolved from a caller
//! argument, and a key's value can reference a sibling key that only settles
//! on a later pass. Rather than building an explicit dependency graph, the
//! resolver serializes the document to text, runs it through the placeholder
//! engine against the current variable map, parses it back, and repeats until
//! a pass produces no [`template::NO_VALUE`] sentinel.
//!
//! The loop is bounded because misspelled or genuinely circular references
//! never converge; exceeding the bound reports every key still unresolved at
//! that point.

use crate::error::{Result, SproutError};
use crate::generate::document::{self, Table};
use crate::generate::overlay::Overlay;
use crate::template;
use serde_json::Value;

/// Default pass bound for fixed-point resolution.
pub const DEFAULT_LOOP_LIMIT: usize = 100;

/// Variable resolver for one generation job.
///
/// The pass bound lives here, on the instance, never in process-global
/// state; callers that want a tighter bound construct their own resolver.
#[derive(Debug, Clone)]
pub struct Resolver {
    loop_limit: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_LOOP_LIMIT)
    }
}

impl Resolver {
    /// Create a resolver with an explicit pass bound.
    pub fn new(loop_limit: usize) -> Self {
        Self { loop_limit }
    }

    /// Resolve a control document against a caller-supplied overlay.
    ///
    /// On success the returned table is the fully resolved document, which
    /// doubles as the final variable map: every key of the document, with
    /// every placeholder substituted.
    ///
    /// The document is mutated in place as resolution progresses: seeded
    /// values and overlay injections land in it up front, and each pass
    /// writes back the entries that rendered clean.
    pub fn resolve(&self, document: &mut Table, overlay: &Overlay) -> Result<Table> {
        let mut variables = seed(document, overlay)?;

        let mut passes = 0usize;
        loop {
            let text = serde_json::to_string(&Value::Object(document.clone()))
                .map_err(|e| SproutError::CorruptIntermediateState(e.to_string()))?;

            let rendered = template::render(&text, &document::string_variables(&variables));

            let value: Value = serde_json::from_str(&rendered)
                .map_err(|e| SproutError::CorruptIntermediateState(e.to_string()))?;
            let Value::Object(parsed) = value else {
                return Err(SproutError::CorruptIntermediateState(
                    "substituted document is no longer a map".to_string(),
                ));
            };

            if !rendered.contains(template::NO_VALUE) {
                return Ok(parsed);
            }

            // Some keys did not converge this pass. Record them, drop them
            // from the variable map so their sentinel text cannot poison the
            // next pass, and keep the document's template text for them so
            // the next pass can retry. Clean entries feed back into both the
            // document and the variable map.
            let mut invalid_keys = Vec::new();
            for (key, value) in &parsed {
                let flat = document::stringify(value);
                if flat.contains(template::NO_VALUE) {
                    match value {
                        Value::String(_) => invalid_keys.push(key.clone()),
                        _ => invalid_keys.push(format!("{} {}", key, flat)),
                    }
                    variables.remove(key);
                } else {
                    document.insert(key.clone(), value.clone());
                    variables.insert(key.clone(), value.clone());
                }
            }

            passes += 1;
            if passes > self.loop_limit {
                return Err(SproutError::UnresolvedVariables(invalid_keys));
            }
        }
    }
}

/// Build the initial variable map and prepare the document for iteration.
///
/// Every top-level key whose value is the empty string must be supplied by
/// the overlay; this is checked before any rendering happens, so a missing
/// variable fails fast with zero substitution passes. Non-empty strings and
/// non-string values are literal defaults and are not overridable here.
/// Overlay keys left unconsumed by seeding are injected as top-level
/// entries when they match no document key, or when they name a reserved
/// `config.` control key, which is how callers override a computed
/// `config.output` that the document already declares.
fn seed(document: &mut Table, overlay: &Overlay) -> Result<Table> {
    let mut variables = Table::new();

    for (key, value) in document.iter() {
        if let Value::String(s) = value
            && s.is_empty()
        {
            match overlay.get(key) {
                Some(supplied) => {
                    variables.insert(key.clone(), Value::String(supplied.clone()));
                }
                None => return Err(SproutError::MissingVariable(key.clone())),
            }
        }
    }

    for (key, value) in &variables {
        document.insert(key.clone(), value.clone());
    }

    for (key, value) in overlay {
        if variables.contains_key(key) {
            continue;
        }
        if !document.contains_key(key) || key.starts_with(document::CONFIG_PREFIX) {
            document.insert(key.clone(), Value::String(value.clone()));
        }
    }

    Ok(variables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::overlay;
    use serde_json::json;

    fn table(value: serde_json::Value) -> Table {
        match value {
            Value::Object(table) => table,
            _ => panic!("test document must be an object"),
        }
    }

    fn pairs(tokens: &[&str]) -> Overlay {
        let args: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        overlay::from_args(&args).unwrap()
    }

    #[test]
    fn converges_in_one_pass_for_direct_references() {
        let mut doc = table(json!({
            "config.type": "single",
            "config.output": "model/{{.package}}.rs",
            "package": ""
        }));

        let resolved = Resolver::default()
            .resolve(&mut doc, &pairs(&["package:car"]))
            .unwrap();

        assert_eq!(resolved.get("package"), Some(&json!("car")));
        assert_eq!(resolved.get("config.output"), Some(&json!("model/car.rs")));
    }

    #[test]
    fn resolves_chained_references_across_passes() {
        // `config.output` references `path`, which itself references the
        // seeded `package` and only settles on the first pass.
        let mut doc = table(json!({
            "config.type": "single",
            "config.output": "src/{{path}}.rs",
            "path": "model/{{package}}/{{package}}",
            "package": ""
        }));

        let resolved = Resolver::default()
            .resolve(&mut doc, &pairs(&["package:car"]))
            .unwrap();

        assert_eq!(resolved.get("path"), Some(&json!("model/car/car")));
        assert_eq!(
            resolved.get("config.output"),
            Some(&json!("src/model/car/car.rs"))
        );
    }

    #[test]
    fn missing_variable_fails_before_iteration() {
        let mut doc = table(json!({
            "config.type": "single",
            "config.output": "model/{{package}}.rs",
            "package": "",
            "table": ""
        }));

        let err = Resolver::default()
            .resolve(&mut doc, &pairs(&["package:car"]))
            .unwrap_err();

        match err {
            SproutError::MissingVariable(key) => assert_eq!(key, "table"),
            other => panic!("unexpected error: {:?}", other),
        }
        // Seeding failed, so no pass ran and the document was not rewritten.
        assert_eq!(doc.get("config.output"), Some(&json!("model/{{package}}.rs")));
    }

    #[test]
    fn non_empty_strings_are_literal_defaults() {
        let mut doc = table(json!({
            "config.type": "single",
            "config.output": "out.rs",
            "package": "fixed"
        }));

        // The overlay tries to override a literal default; it must not win.
        let resolved = Resolver::default()
            .resolve(&mut doc, &pairs(&["package:car"]))
            .unwrap();

        assert_eq!(resolved.get("package"), Some(&json!("fixed")));
    }

    #[test]
    fn unknown_overlay_keys_are_injected() {
        let mut doc = table(json!({
            "config.type": "single",
            "config.output": "model/{{package}}.rs",
            "package": ""
        }));

        let resolved = Resolver::default()
            .resolve(
                &mut doc,
                &pairs(&["package:car", "config.output:custom/{{package}}.rs"]),
            )
            .unwrap();

        // The injected overlay value replaces the computed output path.
        assert_eq!(
            resolved.get("config.output"),
            Some(&json!("custom/car.rs"))
        );
    }

    #[test]
    fn overlay_key_absent_from_document_is_injected() {
        let mut doc = table(json!({
            "config.type": "single",
            "config.output": "gen/{{flavor}}/{{package}}.rs",
            "package": ""
        }));

        // `flavor` is never declared; the caller supplies it out of band.
        let resolved = Resolver::default()
            .resolve(&mut doc, &pairs(&["package:car", "flavor:debug"]))
            .unwrap();

        assert_eq!(resolved.get("flavor"), Some(&json!("debug")));
        assert_eq!(
            resolved.get("config.output"),
            Some(&json!("gen/debug/car.rs"))
        );
    }

    #[test]
    fn overlay_cannot_override_predeclared_plain_keys() {
        let mut doc = table(json!({
            "config.type": "single",
            "config.output": "{{path}}/out.rs",
            "path": "src/model"
        }));

        // Control-key overrides do not extend to plain literal defaults.
        let resolved = Resolver::default()
            .resolve(&mut doc, &pairs(&["path:elsewhere"]))
            .unwrap();

        assert_eq!(resolved.get("config.output"), Some(&json!("src/model/out.rs")));
    }

    #[test]
    fn seeding_is_deterministic() {
        let doc = json!({
            "config.type": "single",
            "config.output": "model/{{package}}/{{table}}.rs",
            "package": "",
            "table": ""
        });
        let overlay = pairs(&["package:car", "table:cars"]);

        let first = Resolver::default()
            .resolve(&mut table(doc.clone()), &overlay)
            .unwrap();
        let second = Resolver::default()
            .resolve(&mut table(doc), &overlay)
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn bound_permits_exactly_one_pass_beyond_the_limit() {
        // This chain settles on the second pass: `path` resolves first,
        // then `config.output` picks it up.
        let doc = json!({
            "config.type": "single",
            "config.output": "src/{{path}}.rs",
            "path": "model/{{package}}",
            "package": ""
        });
        let overlay = pairs(&["package:car"]);

        // A bound of zero still runs the first pass, so a document that
        // converges immediately succeeds even at the tightest bound.
        let direct = Resolver::new(0)
            .resolve(
                &mut table(json!({
                    "config.type": "single",
                    "config.output": "model/{{package}}.rs",
                    "package": ""
                })),
                &overlay,
            )
            .unwrap();
        assert_eq!(direct.get("config.output"), Some(&json!("model/car.rs")));

        // The chained document needs a second pass: bound zero fails after
        // that single pass, naming the key still carrying a placeholder.
        let err = Resolver::new(0)
            .resolve(&mut table(doc.clone()), &overlay)
            .unwrap_err();
        match err {
            SproutError::UnresolvedVariables(keys) => {
                assert_eq!(keys, vec!["config.output".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // Raising the bound by one admits the settling pass.
        let resolved = Resolver::new(1).resolve(&mut table(doc), &overlay).unwrap();
        assert_eq!(
            resolved.get("config.output"),
            Some(&json!("src/model/car.rs"))
        );
    }

    #[test]
    fn cycle_reports_every_stuck_key_at_the_bound() {
        let mut doc = table(json!({
            "config.type": "single",
            "config.output": "out.rs",
            "a": "{{b}}",
            "b": "{{a}}"
        }));

        let err = Resolver::new(3)
            .resolve(&mut doc, &Overlay::new())
            .unwrap_err();

        match err {
            SproutError::UnresolvedVariables(mut keys) => {
                keys.sort();
                assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn nested_values_are_reported_with_their_content() {
        let mut doc = table(json!({
            "config.type": "single",
            "config.output": "out.rs",
            "nested": {"path": "{{missing}}"}
        }));

        let err = Resolver::new(2)
            .resolve(&mut doc, &Overlay::new())
            .unwrap_err();

        match err {
            SproutError::UnresolvedVariables(keys) => {
                assert_eq!(keys.len(), 1);
                assert!(keys[0].starts_with("nested "));
                assert!(keys[0].contains("<no value>"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn non_string_values_survive_resolution() {
        let mut doc = table(json!({
            "config.type": "single",
            "config.output": "model/{{package}}.rs",
            "package": "",
            "retries": 3,
            "flags": ["a", "b"]
        }));

        let resolved = Resolver::default()
            .resolve(&mut doc, &pairs(&["package:car"]))
            .unwrap();

        assert_eq!(resolved.get("retries"), Some(&json!(3)));
        assert_eq!(resolved.get("flags"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn substitution_that_breaks_the_document_is_detected() {
        // A raw quote in a substituted value corrupts the serialized JSON.
        let mut doc = table(json!({
            "config.type": "single",
            "config.output": "out.rs",
            "x": "",
            "y": "{{x}}"
        }));

        let err = Resolver::default()
            .resolve(&mut doc, &pairs(&[r#"x:he said "hi""#]))
            .unwrap_err();

        assert!(matches!(err, SproutError::CorruptIntermediateState(_)));
    }
}
