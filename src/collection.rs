use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Collection {
    pub info: Info,
    #[serde(default)]
    pub item: Vec<CollectionNode>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Info {
    pub name: String,
}

/// One entry of an `item` array. Anything carrying a `request` is a request,
/// everything else is walked as a folder.
#[derive(Debug, Deserialize, Clone)]
#[serde(from = "RawNode")]
pub enum CollectionNode {
    Folder(Folder),
    Request(RequestNode),
}

#[derive(Debug, Clone)]
pub struct Folder {
    pub name: String,
    pub items: Vec<CollectionNode>,
}

#[derive(Debug, Clone)]
pub struct RequestNode {
    pub name: String,
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: BodySpec,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodySpec {
    UrlEncoded(Vec<FormParam>),
    RawJson(String),
    Empty,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FormParam {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    name: String,
    request: Option<RawRequest>,
    #[serde(default)]
    item: Vec<CollectionNode>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRequest {
    Detailed(RequestDef),
    Url(String),
}

#[derive(Debug, Deserialize)]
struct RequestDef {
    #[serde(default = "default_method")]
    method: String,
    #[serde(default)]
    url: Option<UrlDef>,
    #[serde(default)]
    header: Vec<HeaderDef>,
    #[serde(default)]
    body: Option<BodyDef>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UrlDef {
    Detailed {
        #[serde(default)]
        raw: String,
    },
    Raw(String),
}

#[derive(Debug, Deserialize)]
struct HeaderDef {
    key: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct BodyDef {
    mode: Option<String>,
    #[serde(default)]
    urlencoded: Vec<FormParam>,
    #[serde(default)]
    raw: String,
    #[serde(default)]
    options: Option<BodyOptions>,
}

#[derive(Debug, Deserialize)]
struct BodyOptions {
    raw: Option<RawOptions>,
}

#[derive(Debug, Deserialize)]
struct RawOptions {
    language: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl From<RawNode> for CollectionNode {
    fn from(raw: RawNode) -> Self {
        match raw.request {
            Some(request) => CollectionNode::Request(RequestNode::from_def(raw.name, request)),
            None => CollectionNode::Folder(Folder {
                name: raw.name,
                items: raw.item,
            }),
        }
    }
}

impl RequestNode {
    fn from_def(name: String, request: RawRequest) -> Self {
        let def = match request {
            RawRequest::Detailed(def) => def,
            RawRequest::Url(url) => RequestDef {
                method: default_method(),
                url: Some(UrlDef::Raw(url)),
                header: Vec::new(),
                body: None,
            },
        };

        let url = match def.url {
            Some(UrlDef::Detailed { raw }) | Some(UrlDef::Raw(raw)) => raw,
            None => String::new(),
        };

        Self {
            name,
            method: def.method,
            url,
            headers: def.header.into_iter().map(|h| (h.key, h.value)).collect(),
            body: def.body.map(BodySpec::from).unwrap_or(BodySpec::Empty),
        }
    }
}

impl From<BodyDef> for BodySpec {
    fn from(body: BodyDef) -> Self {
        match body.mode.as_deref() {
            Some("urlencoded") => BodySpec::UrlEncoded(body.urlencoded),
            Some("raw") if body.is_json() => BodySpec::RawJson(body.raw),
            _ => BodySpec::Empty,
        }
    }
}

impl BodyDef {
    fn is_json(&self) -> bool {
        self.options
            .as_ref()
            .and_then(|o| o.raw.as_ref())
            .and_then(|r| r.language.as_deref())
            == Some("json")
    }
}

pub fn parse_collection(raw: &str) -> Result<Collection> {
    serde_json::from_str(raw).context("invalid postman collection")
}

pub fn load_collection(path: &Path) -> Result<Collection> {
    let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut buf = String::new();
    file.read_to_string(&mut buf)
        .with_context(|| format!("read {}", path.display()))?;
    parse_collection(&buf).with_context(|| format!("parse collection {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    const COLLECTION: &str = indoc! {r#"
        {
          "info": { "name": "Demo API", "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json" },
          "item": [
            {
              "name": "Users",
              "item": [
                {
                  "name": "Get User",
                  "request": {
                    "method": "GET",
                    "url": { "raw": "{{baseUrl}}/users/{{userId}}", "host": ["{{baseUrl}}"] },
                    "header": [{ "key": "Authorization", "value": "Bearer {{token}}", "type": "text" }]
                  }
                }
              ]
            },
            {
              "name": "Login",
              "request": {
                "method": "POST",
                "url": "{{baseUrl}}/login",
                "body": {
                  "mode": "urlencoded",
                  "urlencoded": [
                    { "key": "user", "value": "{{user}}" },
                    { "key": "debug", "value": "1", "disabled": true }
                  ]
                }
              }
            },
            { "name": "Ping", "request": "https://example.com/ping" }
          ]
        }
    "#};

    #[test]
    fn parses_folders_and_requests_in_order() {
        let collection = parse_collection(COLLECTION).unwrap();
        assert_eq!(collection.info.name, "Demo API");
        assert_eq!(collection.item.len(), 3);

        let CollectionNode::Folder(users) = &collection.item[0] else {
            panic!("expected folder");
        };
        assert_eq!(users.name, "Users");
        let CollectionNode::Request(get_user) = &users.items[0] else {
            panic!("expected request");
        };
        assert_eq!(get_user.method, "GET");
        assert_eq!(get_user.url, "{{baseUrl}}/users/{{userId}}");
        assert_eq!(
            get_user.headers,
            vec![("Authorization".to_string(), "Bearer {{token}}".to_string())]
        );
        assert_eq!(get_user.body, BodySpec::Empty);
    }

    #[test]
    fn accepts_string_url_and_string_request() {
        let collection = parse_collection(COLLECTION).unwrap();
        let CollectionNode::Request(login) = &collection.item[1] else {
            panic!("expected request");
        };
        assert_eq!(login.url, "{{baseUrl}}/login");
        let BodySpec::UrlEncoded(params) = &login.body else {
            panic!("expected urlencoded body");
        };
        assert_eq!(params.len(), 2);
        assert!(params[1].disabled);

        let CollectionNode::Request(ping) = &collection.item[2] else {
            panic!("expected request");
        };
        assert_eq!(ping.method, "GET");
        assert_eq!(ping.url, "https://example.com/ping");
        assert!(ping.headers.is_empty());
    }

    #[test]
    fn raw_body_is_json_only_when_language_says_so() {
        let json = indoc! {r#"
            { "info": { "name": "c" }, "item": [
              { "name": "a", "request": { "method": "POST", "url": "x",
                "body": { "mode": "raw", "raw": "{}", "options": { "raw": { "language": "json" } } } } },
              { "name": "b", "request": { "method": "POST", "url": "x",
                "body": { "mode": "raw", "raw": "hello" } } },
              { "name": "c", "request": { "method": "POST", "url": "x",
                "body": { "mode": "formdata", "formdata": [] } } }
            ] }
        "#};
        let collection = parse_collection(json).unwrap();
        let bodies: Vec<BodySpec> = collection
            .item
            .iter()
            .map(|node| match node {
                CollectionNode::Request(r) => r.body.clone(),
                CollectionNode::Folder(_) => panic!("expected request"),
            })
            .collect();
        assert_eq!(
            bodies,
            vec![BodySpec::RawJson("{}".to_string()), BodySpec::Empty, BodySpec::Empty]
        );
    }

    #[test]
    fn node_without_request_or_items_is_an_empty_folder() {
        let collection =
            parse_collection(r#"{ "info": { "name": "c" }, "item": [ { "name": "Empty" } ] }"#)
                .unwrap();
        let CollectionNode::Folder(folder) = &collection.item[0] else {
            panic!("expected folder");
        };
        assert!(folder.items.is_empty());
    }

    #[test]
    fn missing_info_is_an_error() {
        assert!(parse_collection(r#"{ "item": [] }"#).is_err());
        assert!(parse_collection("not json").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.postman_collection.json");
        std::fs::write(&path, COLLECTION).unwrap();
        let collection = load_collection(&path).unwrap();
        assert_eq!(collection.item.len(), 3);

        let err = load_collection(&dir.path().join("missing.json")).unwrap_err();
        assert!(format!("{err:#}").contains("open"));
    }
}
