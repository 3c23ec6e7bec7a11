//! Placeholder substitution.
//!
//! Accepts `{name}` and `{{ name }}`. Names are identifiers, so nginx block
//! braces and regex quantifiers such as `\d{3}` are left alone. A single-brace
//! name preceded by `$` is an nginx variable (`${host}`) and is copied as is.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::template::TemplateError;

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}",
            r"|(\$?)\{([A-Za-z_][A-Za-z0-9_]*)\}",
        ))
        .expect("placeholder pattern is valid")
    })
}

/// Substitute every placeholder in `body` from `values`.
///
/// Fails on the first placeholder with no value.
pub fn render_str(body: &str, values: &HashMap<&str, String>) -> Result<String, TemplateError> {
    let mut missing = None;

    let rendered = placeholder().replace_all(body, |caps: &Captures| {
        if caps.get(2).is_some_and(|m| !m.is_empty()) {
            return caps[0].to_owned();
        }
        let key = caps
            .get(1)
            .or_else(|| caps.get(3))
            .map_or("", |m| m.as_str());
        match values.get(key) {
            Some(value) => value.clone(),
            None => {
                missing.get_or_insert_with(|| key.to_owned());
                caps[0].to_owned()
            }
        }
    });

    match missing {
        Some(key) => Err(TemplateError::Render(key)),
        None => Ok(rendered.into_owned()),
    }
}
