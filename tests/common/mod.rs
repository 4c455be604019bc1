//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use async_trait::async_trait;
use orbita::config::ClientSettings;
use orbita::transport::{
    ResponseBody, Transport, TransportError, TransportRequest, TransportResponse,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Ordered record of callback / listener events.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn record(log: &EventLog, event: impl Into<String>) {
    log.lock().push(event.into());
}

/// Create a temporary config file with the given TOML content.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Client settings pointing at a mock server.
pub fn settings_for(base_url: &str) -> ClientSettings {
    ClientSettings {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
        ..ClientSettings::default()
    }
}

/// Wait for a server to become available.
pub async fn wait_for_server(addr: SocketAddr, timeout: Duration) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

pub fn page_json(component: &str, url: &str, props: Value) -> Value {
    json!({
        "component": component,
        "props": props,
        "url": url,
        "version": "1",
    })
}

// -- In-memory transport ------------------------------------------------------

/// A scripted reply for [`MockTransport`].
#[derive(Debug, Clone)]
pub enum MockReply {
    Ok(ResponseBody),
    Status(u16, ResponseBody),
    NetworkDown,
}

impl MockReply {
    pub fn page(component: &str, url: &str, props: Value) -> Self {
        MockReply::Ok(ResponseBody::Json(page_json(component, url, props)))
    }

    pub fn validation(errors: Value) -> Self {
        MockReply::Status(422, ResponseBody::Json(json!({ "errors": errors })))
    }

    pub fn server_error() -> Self {
        MockReply::Status(500, ResponseBody::Text("Internal Server Error".to_string()))
    }
}

#[derive(Default)]
struct MockTransportState {
    requests: Mutex<Vec<TransportRequest>>,
    replies: Mutex<VecDeque<(MockReply, Duration)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Transport that records requests and answers from a script.
///
/// Unscripted requests get a `Home` page at `/`. Clones share the script.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<MockTransportState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, reply: MockReply) -> &Self {
        self.reply_after(reply, Duration::ZERO)
    }

    pub fn reply_after(&self, reply: MockReply, delay: Duration) -> &Self {
        self.state.replies.lock().push_back((reply, delay));
        self
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.state.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().len()
    }

    /// Highest number of concurrently outstanding requests seen.
    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let now = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let url = request.url.clone();
        self.state.requests.lock().push(request);
        let (reply, delay) = self
            .state
            .replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| (MockReply::page("Home", "/", json!({})), Duration::ZERO));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            MockReply::Ok(body) => Ok(TransportResponse { status: 200, body }),
            MockReply::Status(status, body) => Err(TransportError::Http { status, body }),
            MockReply::NetworkDown => Err(TransportError::Network {
                url,
                message: "connection refused".to_string(),
            }),
        }
    }
}
