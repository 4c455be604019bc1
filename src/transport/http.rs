use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart;
use reqwest::{Client, Url};
use tokio::time::timeout;

use crate::config::ClientSettings;
use crate::transport::error::TransportError;
use crate::transport::{
    upsert_header, FormData, RequestData, ResponseBody, Transport, TransportRequest,
    TransportResponse,
};

/// reqwest-backed [`Transport`].
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    request_timeout: Duration,
    default_headers: Vec<(String, String)>,
}

impl HttpTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, TransportError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            TransportError::InvalidRequest(format!(
                "Invalid base URL '{}': {}",
                settings.base_url, e
            ))
        })?;

        let client = Client::builder()
            .connect_timeout(settings.connect_timeout())
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| {
                TransportError::InvalidRequest(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            request_timeout: settings.request_timeout(),
            default_headers: settings
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a visit URL (absolute, or path + query) against the base URL.
    pub fn resolve_url(&self, url: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(url)
            .map_err(|e| TransportError::InvalidRequest(format!("Invalid URL '{}': {}", url, e)))
    }

    async fn do_send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut target = self.resolve_url(&request.url)?;

        if request.method.is_get() && !request.data.is_empty() {
            target
                .query_pairs_mut()
                .extend_pairs(request.data.query_pairs());
        }

        let target_str = target.to_string();
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        let mut builder = self.client.request(method, target);

        for (name, value) in merge_headers(&self.default_headers, &request.headers) {
            builder = builder.header(name, value);
        }

        if !request.method.is_get() && !request.data.is_empty() {
            builder = match request.data {
                RequestData::Form(form) => builder.multipart(multipart_form(form)),
                RequestData::Json(map) => {
                    let body = serde_json::to_vec(&map).map_err(|e| {
                        TransportError::InvalidRequest(format!("Failed to encode body: {}", e))
                    })?;
                    builder.header(CONTENT_TYPE, "application/json").body(body)
                }
            };
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                TransportError::InvalidRequest(e.to_string())
            } else {
                TransportError::Network {
                    url: target_str.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |ct| ct.contains("application/json"));

        let bytes = response.bytes().await.map_err(|e| TransportError::Network {
            url: target_str.clone(),
            message: format!("Failed to read response body: {}", e),
        })?;
        let body = parse_body(&bytes, is_json);

        tracing::trace!(url = %target_str, status = status.as_u16(), "Response received");

        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        match timeout(self.request_timeout, self.do_send(request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                duration: self.request_timeout.as_secs(),
            }),
        }
    }
}

/// Configured headers overlaid with the request's own; names compare case-insensitively.
fn merge_headers(
    defaults: &[(String, String)],
    request: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged = Vec::with_capacity(defaults.len() + request.len());
    for (name, value) in defaults.iter().chain(request) {
        upsert_header(&mut merged, name, value);
    }
    merged
}

fn multipart_form(form: FormData) -> multipart::Form {
    form.entries()
        .iter()
        .fold(multipart::Form::new(), |acc, (name, value)| {
            acc.text(name.clone(), value.clone())
        })
}

/// JSON when declared JSON and parseable, raw text otherwise.
fn parse_body(bytes: &[u8], is_json: bool) -> ResponseBody {
    if is_json {
        if let Ok(value) = serde_json::from_slice(bytes) {
            return ResponseBody::Json(value);
        }
    }
    ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned())
}
