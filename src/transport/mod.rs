//! Single-request HTTP transport.
//!
//! The [`Transport`] trait is the seam the router talks through. The
//! production implementation is [`HttpTransport`] (reqwest); tests plug in
//! in-memory transports.

pub mod error;
pub mod http;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use error::TransportError;
pub use http::HttpTransport;

/// HTTP methods a visit can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    pub fn is_get(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            "patch" => Ok(Method::Patch),
            "delete" => Ok(Method::Delete),
            other => Err(format!("unsupported method '{}'", other)),
        }
    }
}

/// Ordered multipart-style field entries.
///
/// Sent verbatim as a multipart body for non-GET requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Payload of a visit.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestData {
    /// Structured data, sent as JSON (or query parameters for GET).
    Json(Map<String, Value>),
    /// Form entries, passed through as multipart (or query parameters for GET).
    Form(FormData),
}

impl Default for RequestData {
    fn default() -> Self {
        RequestData::Json(Map::new())
    }
}

impl From<Map<String, Value>> for RequestData {
    fn from(map: Map<String, Value>) -> Self {
        RequestData::Json(map)
    }
}

impl From<FormData> for RequestData {
    fn from(form: FormData) -> Self {
        RequestData::Form(form)
    }
}

impl RequestData {
    pub fn is_empty(&self) -> bool {
        match self {
            RequestData::Json(map) => map.is_empty(),
            RequestData::Form(form) => form.is_empty(),
        }
    }

    /// Flatten into `(key, value)` pairs for a query string.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match self {
            RequestData::Json(map) => map
                .iter()
                .map(|(key, value)| (key.clone(), query_value(value)))
                .collect(),
            RequestData::Form(form) => form.entries().to_vec(),
        }
    }
}

/// Stringify a JSON value the way a URL search-params encoder would.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(query_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Parsed response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }
}

/// One outgoing request.
#[derive(Debug, Clone, Default)]
pub struct TransportRequest {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub data: RequestData,
}

/// Set `name` to `value`, replacing an existing entry whatever its case.
pub(crate) fn upsert_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
    {
        Some(entry) => entry.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

impl TransportRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A 2xx response.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: ResponseBody,
}

/// Performs exactly one request.
///
/// Implementations must map any non-2xx status to [`TransportError::Http`]
/// and any failure without a response to a status-less variant.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("POST".parse::<Method>().unwrap(), Method::Post);
        assert_eq!("delete".parse::<Method>().unwrap(), Method::Delete);
        assert!("options".parse::<Method>().is_err());
    }

    #[test]
    fn query_pairs_stringify_values() {
        let data = RequestData::Json(
            json!({"page": 2, "q": "rust", "tags": ["a", "b"], "flag": true})
                .as_object()
                .unwrap()
                .clone(),
        );
        let pairs = data.query_pairs();
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert!(pairs.contains(&("q".to_string(), "rust".to_string())));
        assert!(pairs.contains(&("tags".to_string(), "a,b".to_string())));
        assert!(pairs.contains(&("flag".to_string(), "true".to_string())));
    }

    #[test]
    fn form_data_preserves_order() {
        let form: FormData = vec![("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(form.entries()[0].0, "b");
        assert_eq!(form.get("a"), Some("1"));
        assert!(!RequestData::Form(form).is_empty());
        assert!(RequestData::default().is_empty());
    }

    #[test]
    fn request_header_lookup_ignores_case() {
        let request = TransportRequest {
            headers: vec![("X-Orbita".to_string(), "true".to_string())],
            ..Default::default()
        };
        assert_eq!(request.header("x-orbita"), Some("true"));
        assert_eq!(request.header("x-missing"), None);
    }
}
