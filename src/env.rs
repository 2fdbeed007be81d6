//! Environment placeholder resolution
//!
//! Strings handed to the plugin may contain `${NAME}` or `$NAME` placeholders.
//! Each one is looked up in the process environment, first as
//! `UPPERCASE(prefix + "_" + NAME)` and then as the bare `NAME`. A placeholder
//! that resolves to nothing is replaced by the empty string; resolution never
//! fails.

use log::debug;
use regex::Regex;
use std::sync::LazyLock;

/// `$` + optional `{` + word + optional `}` + optional trailing `.`
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(\{?([A-Za-z0-9_]+)\}?)\.?").expect("placeholder pattern is valid")
});

/// A placeholder found in a template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvPlaceholder {
    /// The exact text that gets replaced, e.g. `${TAG}` or `$TAG.`
    pub token: String,
    /// The variable name without decoration, e.g. `TAG`
    pub name: String,
}

/// Extract every placeholder from `template`, left to right.
///
/// Repeated tokens are returned once per occurrence.
pub fn extract_placeholders(template: &str) -> Vec<EnvPlaceholder> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|caps| EnvPlaceholder {
            token: caps[0].to_string(),
            name: caps[2].to_string(),
        })
        .collect()
}

/// The environment key tried before the bare name.
pub fn prefixed_key(prefix: &str, name: &str) -> String {
    format!("{}_{}", prefix, name).to_uppercase()
}

/// Resolve placeholders in `template` against the process environment.
pub fn resolve(template: &str, prefix: &str, debug: bool) -> String {
    resolve_with(template, prefix, debug, |key| std::env::var(key).ok())
}

/// Resolve placeholders in `template` using `lookup` as the environment.
///
/// Empty values count as absent, so an empty `PREFIX_NAME` still falls back
/// to `NAME`. Every occurrence of a token is replaced at once.
pub fn resolve_with<F>(template: &str, prefix: &str, debug: bool, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let lookup_non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

    let mut resolved = template.to_string();
    for placeholder in extract_placeholders(template) {
        let prefixed = prefixed_key(prefix, &placeholder.name);
        let value = lookup_non_empty(&prefixed)
            .or_else(|| lookup_non_empty(&placeholder.name))
            .unwrap_or_default();

        if debug {
            debug!("-ReplVar: {} => {}-- {}", prefixed, placeholder.name, value);
        }

        if resolved.contains(&placeholder.token) {
            resolved = resolved.replace(&placeholder.token, &value);
        }
    }

    resolved
}
