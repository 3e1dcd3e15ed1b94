//! Python source literals.

use crate::placeholder::Segment;

pub const INDENT: &str = "    ";

fn escape_into(out: &mut String, text: &str, fstring: bool) {
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '{' if fstring => out.push_str("{{"),
            '}' if fstring => out.push_str("}}"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
}

/// `"text"` with quotes, backslashes and control characters escaped.
pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    escape_into(&mut out, text, false);
    out.push('"');
    out
}

/// `f"..."` that interpolates every [`Segment::Var`] by name. This is how
/// `{{name}}` becomes `{name}` in generated URLs and headers.
pub fn fstring(segments: &[Segment]) -> String {
    let mut out = String::from("f\"");
    for segment in segments {
        match segment {
            Segment::Literal(text) => escape_into(&mut out, text, true),
            Segment::Var(name) => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
    }
    out.push('"');
    out
}

/// Cheapest expression for a templated value: a bare parameter when the value
/// is exactly one placeholder, a plain literal when it has none, otherwise an
/// f-string.
pub fn value_expr(segments: &[Segment]) -> String {
    match segments {
        [Segment::Var(name)] => name.clone(),
        _ if segments.iter().all(|s| matches!(s, Segment::Literal(_))) => {
            let text: String = segments
                .iter()
                .filter_map(|s| match s {
                    Segment::Literal(text) => Some(text.as_str()),
                    Segment::Var(_) => None,
                })
                .collect();
            string_literal(&text)
        }
        _ => fstring(segments),
    }
}

fn trailing_backslashes(text: &str) -> usize {
    text.chars().rev().take_while(|c| *c == '\\').count()
}

/// `"""raw"""`, with embedded triple quotes escaped. The tail is escaped too,
/// so neither a final quote nor a final backslash can eat the closing quotes.
pub fn triple_quoted(raw: &str) -> String {
    let mut body = raw.replace("\"\"\"", "\\\"\\\"\\\"");
    if let Some(head) = body.strip_suffix('"') {
        if trailing_backslashes(head) % 2 == 0 {
            body = format!("{head}\\\"");
        }
    } else if trailing_backslashes(&body) % 2 == 1 {
        body.push('\\');
    }
    format!("\"\"\"{body}\"\"\"")
}

/// Renders `entries` as a dict display whose body sits one level below
/// `indent` levels.
pub fn dict(entries: &[(String, String)], indent: usize) -> String {
    if entries.is_empty() {
        return "{}".to_string();
    }
    let inner = INDENT.repeat(indent + 1);
    let lines: Vec<String> = entries
        .iter()
        .map(|(key, value)| format!("{inner}{key}: {value}"))
        .collect();
    format!("{{\n{}\n{}}}", lines.join(",\n"), INDENT.repeat(indent))
}

/// Same layout as [`dict`], for a list display.
pub fn list(items: &[String], indent: usize) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }
    let inner = INDENT.repeat(indent + 1);
    let lines: Vec<String> = items.iter().map(|item| format!("{inner}{item}")).collect();
    format!("[\n{}\n{}]", lines.join(",\n"), INDENT.repeat(indent))
}
