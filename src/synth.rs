use indexmap::IndexMap;
use std::collections::BTreeSet;

use crate::collection::{BodySpec, RequestNode};
use crate::json_body::render_json_body;
use crate::placeholder::{Segment, extract_placeholders, rewrite_placeholders, segments};
use crate::python;
use crate::slug::slugify_or;

/// Helper emitted at the top of every module, whether or not the function
/// uses it.
const FILE_HELPER: &str = r#"def read_file_content(path):
    with open(path, "r", encoding="utf-8") as f:
        return f.read()"#;

#[derive(Debug, Clone, PartialEq)]
pub enum BodyPayload {
    /// Form field name to Python expression.
    Form(IndexMap<String, String>),
    /// Python display built from the parsed JSON.
    Json(String),
    /// Raw text that did not parse; embedded as a string literal.
    JsonFallback(String),
    Empty,
}

impl BodyPayload {
    fn call_arg(&self) -> &'static str {
        match self {
            BodyPayload::Json(_) | BodyPayload::JsonFallback(_) => "json=data",
            BodyPayload::Form(_) | BodyPayload::Empty => "data=data",
        }
    }

    fn render(&self) -> String {
        match self {
            BodyPayload::Form(fields) => {
                let entries: Vec<(String, String)> = fields
                    .iter()
                    .map(|(k, v)| (python::string_literal(k), v.clone()))
                    .collect();
                python::dict(&entries, 1)
            }
            BodyPayload::Json(display) => display.clone(),
            BodyPayload::JsonFallback(raw) => python::triple_quoted(raw),
            BodyPayload::Empty => "{}".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedFunction {
    pub name: String,
    pub method: String,
    pub params: BTreeSet<String>,
    pub url: Vec<Segment>,
    pub headers: IndexMap<String, Vec<Segment>>,
    pub body: BodyPayload,
}

impl GeneratedFunction {
    pub fn file_name(&self) -> String {
        format!("{}.py", self.name)
    }

    pub fn render(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(String::as_str).collect();
        let headers: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|(k, v)| (python::string_literal(k), python::fstring(v)))
            .collect();

        let mut out = String::new();
        out.push_str("import requests\n\n");
        out.push_str(FILE_HELPER);
        out.push_str("\n\n");
        out.push_str(&format!("def {}({}):\n", self.name, params.join(", ")));
        out.push_str(&format!("    url = {}\n", python::fstring(&self.url)));
        out.push_str(&format!("    headers = {}\n", python::dict(&headers, 1)));
        out.push_str(&format!("    data = {}\n", self.body.render()));
        out.push_str(&format!(
            "    response = requests.{}(url, headers=headers, {})\n",
            self.method,
            self.body.call_arg()
        ));
        out.push_str("    return response\n");
        out
    }
}

pub fn synthesize(request: &RequestNode) -> GeneratedFunction {
    // The rendered URL itself comes from `segments` + `python::fstring` below.
    log::debug!(
        "request {:?}: {} {}",
        request.name,
        request.method,
        rewrite_placeholders(&request.url)
    );
    let mut params: BTreeSet<String> = BTreeSet::new();

    params.extend(extract_placeholders(&request.url));
    let url = segments(&request.url);

    // Later duplicates replace the value but keep the first key's position.
    let mut header_values: IndexMap<String, String> = IndexMap::new();
    for (key, value) in &request.headers {
        header_values.insert(key.clone(), value.clone());
    }
    let mut headers = IndexMap::new();
    for (key, value) in header_values {
        params.extend(extract_placeholders(&value));
        headers.insert(key, segments(&value));
    }

    let body = match &request.body {
        BodySpec::UrlEncoded(items) => {
            let mut values: IndexMap<String, String> = IndexMap::new();
            for item in items.iter().filter(|item| !item.disabled) {
                values.insert(item.key.clone(), item.value.clone());
            }
            let mut fields = IndexMap::new();
            for (key, value) in values {
                params.extend(extract_placeholders(&value));
                fields.insert(key, python::value_expr(&segments(&value)));
            }
            BodyPayload::Form(fields)
        }
        BodySpec::RawJson(raw) => {
            params.extend(extract_placeholders(raw));
            match render_json_body(raw, 1) {
                Some(display) => BodyPayload::Json(display),
                None => {
                    log::warn!(
                        "{}: raw JSON body does not parse, embedding it verbatim",
                        request.name
                    );
                    BodyPayload::JsonFallback(raw.clone())
                }
            }
        }
        BodySpec::Empty => BodyPayload::Empty,
    };

    GeneratedFunction {
        name: slugify_or(&request.name, "request"),
        method: request.method.to_lowercase(),
        params,
        url,
        headers,
        body,
    }
}
