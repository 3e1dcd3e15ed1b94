//! Display name to file/identifier slug.
//!
//! No uniqueness is enforced: two names that slug the same collide, and the
//! later file overwrites the earlier one.

use once_cell::sync::Lazy;
use regex::Regex;

static FORBIDDEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("Invalid forbidden-char regex"));

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").expect("Invalid non-word regex"));

pub fn slugify(name: &str) -> String {
    let name = name.trim().to_lowercase();
    let name = FORBIDDEN_RE.replace_all(&name, "");
    let name = WHITESPACE_RE.replace_all(&name, "_");
    NON_WORD_RE.replace_all(&name, "").into_owned()
}

/// Like [`slugify`], but never returns an empty slug.
pub fn slugify_or(name: &str, fallback: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        return fallback.to_string();
    }
    slug
}
