//! `{{name}}` variable references in URLs, header values and bodies.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("Invalid placeholder regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Var(String),
}

fn var_name<'a>(caps: &'a Captures<'_>) -> Option<&'a str> {
    let name = caps.get(1)?.as_str().trim();
    (!name.is_empty()).then_some(name)
}

/// Names referenced by `{{ }}` in `s`, in order of appearance, duplicates kept.
pub fn extract_placeholders(s: &str) -> Vec<String> {
    PLACEHOLDER_RE
        .captures_iter(s)
        .filter_map(|caps| var_name(&caps).map(str::to_string))
        .collect()
}

/// Turns every `{{name}}` into a single-brace `{name}` interpolation slot.
///
/// Generated code does not splice this string directly: URLs and headers go
/// through [`segments`] and `python::fstring`, which produce the same slots but
/// also escape literal braces and quotes. This plain form is used for logging.
pub fn rewrite_placeholders(s: &str) -> String {
    replace_placeholders(s, |name| format!("{{{name}}}"))
}

/// Replaces every placeholder with whatever `f` returns for its name.
pub fn replace_placeholders(s: &str, mut f: impl FnMut(&str) -> String) -> String {
    PLACEHOLDER_RE
        .replace_all(s, |caps: &Captures| match var_name(caps) {
            Some(name) => f(name),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Splits `s` into literal text and placeholder references.
pub fn segments(s: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(s) {
        let Some(name) = var_name(&caps) else { continue };
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            out.push(Segment::Literal(s[last..whole.start()].to_string()));
        }
        out.push(Segment::Var(name.to_string()));
        last = whole.end();
    }
    if last < s.len() {
        out.push(Segment::Literal(s[last..].to_string()));
    }
    out
}
