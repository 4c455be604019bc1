//! Page descriptors exchanged with the server.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A server-rendered page: which component to mount and the props to mount it with.
///
/// Descriptors are never mutated after they arrive. The host replaces the
/// previous descriptor together with the resolved component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDescriptor {
    /// Name the component resolver understands (e.g. "Users/Index").
    pub component: String,
    /// Opaque props for the component.
    #[serde(default)]
    pub props: Map<String, Value>,
    /// Canonical path + query of the page.
    pub url: String,
    /// Asset/schema version tag, if the server sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Raised when the hosting document does not provide a usable initial page.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(
        "Orbita page data not found. Make sure the server is rendering the initial page data."
    )]
    MissingInitialPage,

    #[error("Initial page data is not a valid page descriptor: {source}")]
    InvalidInitialPage {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to resolve initial component '{component}': {source}")]
    ComponentResolution {
        component: String,
        #[source]
        source: anyhow::Error,
    },
}

impl PageDescriptor {
    /// Parse a descriptor out of a response body.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Read the initial page embedded by the server in the hosting document.
    ///
    /// `raw` is the serialized descriptor (the contents of the page data
    /// script), or `None` when the document carries none.
    pub fn from_host_document(raw: Option<&str>) -> Result<Self, StartupError> {
        let raw = match raw.map(str::trim) {
            Some(raw) if !raw.is_empty() && raw != "null" => raw,
            _ => return Err(StartupError::MissingInitialPage),
        };

        serde_json::from_str(raw).map_err(|source| StartupError::InvalidInitialPage { source })
    }

    /// Look up a single prop.
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_descriptor_without_version() {
        let page = PageDescriptor::from_value(json!({
            "component": "Users/Index",
            "props": {"users": [1, 2]},
            "url": "/users"
        }))
        .unwrap();

        assert_eq!(page.component, "Users/Index");
        assert_eq!(page.url, "/users");
        assert!(page.version.is_none());
        assert_eq!(page.prop("users"), Some(&json!([1, 2])));
    }

    #[test]
    fn missing_props_default_to_empty() {
        let page =
            PageDescriptor::from_value(json!({"component": "Home", "url": "/"})).unwrap();
        assert!(page.props.is_empty());
    }

    #[test]
    fn host_document_without_page_is_fatal() {
        assert!(matches!(
            PageDescriptor::from_host_document(None),
            Err(StartupError::MissingInitialPage)
        ));
        assert!(matches!(
            PageDescriptor::from_host_document(Some("  ")),
            Err(StartupError::MissingInitialPage)
        ));
        assert!(matches!(
            PageDescriptor::from_host_document(Some("null")),
            Err(StartupError::MissingInitialPage)
        ));
    }

    #[test]
    fn host_document_with_garbage_is_invalid() {
        let err = PageDescriptor::from_host_document(Some(r#"{"props": {}}"#)).unwrap_err();
        assert!(matches!(err, StartupError::InvalidInitialPage { .. }));
    }

    #[test]
    fn host_document_round_trips_version() {
        let page = PageDescriptor::from_host_document(Some(
            r#"{"component":"Home","props":{},"url":"/","version":"abc123"}"#,
        ))
        .unwrap();
        assert_eq!(page.version.as_deref(), Some("abc123"));
    }
}
