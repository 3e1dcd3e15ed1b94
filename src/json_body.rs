//! Raw JSON bodies rendered as Python displays.
//!
//! Placeholders are swapped for private-use markers before parsing, so a
//! placeholder works both as a whole value (`"id": {{id}}`) and inside a
//! string (`"name": "{{user}}"`). After parsing, only string leaves and keys
//! that carried a marker turn back into parameter references; a literal
//! string that merely equals a parameter name stays a string.

use serde_json::Value;

use crate::placeholder::{Segment, segments};
use crate::python;

const MARK_OPEN: char = '\u{E000}';
const MARK_CLOSE: char = '\u{E001}';

fn mark_placeholders(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;

    for segment in segments(raw) {
        match segment {
            Segment::Literal(text) => {
                for ch in text.chars() {
                    if in_string {
                        if escaped {
                            escaped = false;
                        } else if ch == '\\' {
                            escaped = true;
                        } else if ch == '"' {
                            in_string = false;
                        }
                    } else if ch == '"' {
                        in_string = true;
                    }
                }
                out.push_str(&text);
            }
            Segment::Var(name) => {
                escaped = false;
                let quoted = Value::String(format!("{MARK_OPEN}{name}{MARK_CLOSE}")).to_string();
                if in_string {
                    out.push_str(&quoted[1..quoted.len() - 1]);
                } else {
                    out.push_str(&quoted);
                }
            }
        }
    }
    out
}

fn unmark(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(MARK_OPEN) {
        let after = &rest[start + MARK_OPEN.len_utf8()..];
        let Some(end) = after.find(MARK_CLOSE) else {
            break;
        };
        if start > 0 {
            out.push(Segment::Literal(rest[..start].to_string()));
        }
        out.push(Segment::Var(after[..end].to_string()));
        rest = &after[end + MARK_CLOSE.len_utf8()..];
    }
    if !rest.is_empty() {
        out.push(Segment::Literal(rest.to_string()));
    }
    out
}

fn render_value(value: &Value, indent: usize) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => python::value_expr(&unmark(s)),
        Value::Array(items) => {
            let items: Vec<String> = items
                .iter()
                .map(|item| render_value(item, indent + 1))
                .collect();
            python::list(&items, indent)
        }
        Value::Object(map) => {
            let entries: Vec<(String, String)> = map
                .iter()
                .map(|(k, v)| (python::value_expr(&unmark(k)), render_value(v, indent + 1)))
                .collect();
            python::dict(&entries, indent)
        }
    }
}

/// Python expression for `raw`, or `None` when it is not valid JSON even with
/// its placeholders filled in.
pub fn render_json_body(raw: &str, indent: usize) -> Option<String> {
    let marked = mark_placeholders(raw);
    match serde_json::from_str::<Value>(&marked) {
        Ok(value) => Some(render_value(&value, indent)),
        Err(err) => {
            log::debug!("raw body is not JSON after placeholder substitution: {err}");
            None
        }
    }
}
