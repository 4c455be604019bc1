//! Navigation core.
//!
//! A [`Router`] owns the single in-flight navigation slot. Every visit first
//! waits for the slot, so at most one request from a router is outstanding
//! at any time. Waiting never cancels the earlier visit: when two visits
//! overlap, the later one is simply sent after the earlier one settles.
//!
//! ```text
//! idle ──visit──→ waiting ──slot──→ in-flight ──→ succeeded ─┐
//!                    │                         └─→ failed ───┤
//!                    └── on_before == false ──→ cancelled    └─→ idle
//! ```

pub mod headers;
pub mod options;
pub mod outcome;

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use futures_core::future::BoxFuture;
use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::config::ClientSettings;
use crate::page::PageDescriptor;
use crate::transport::{
    HttpTransport, Method, RequestData, Transport, TransportError, TransportRequest,
};

pub use options::{VisitCallbacks, VisitOptions};
pub use outcome::{ErrorMap, VisitError, VisitOutcome, GENERIC_ERROR_KEY, GENERIC_ERROR_MESSAGE};

/// A page delivered to the page-change listener, with the visit's signals.
#[derive(Debug, Clone, PartialEq)]
pub struct PageChange {
    pub page: PageDescriptor,
    pub replace: bool,
    pub preserve_state: bool,
    pub preserve_scroll: bool,
}

/// Receives every successfully loaded page. The visit holds its slot until
/// the returned future completes.
pub type PageListener = Arc<dyn Fn(PageChange) -> BoxFuture<'static, ()> + Send + Sync>;

/// Navigation handle. Cloning shares the same slot and listener.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

struct RouterInner {
    transport: Arc<dyn Transport>,
    page_listener: RwLock<Option<PageListener>>,
    slot: Mutex<()>,
    in_flight: AtomicBool,
    next_visit_id: AtomicU64,
    current_url: RwLock<String>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("current_url", &*self.inner.current_url.read())
            .field("navigating", &self.is_navigating())
            .finish()
    }
}

impl Router {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_transport(Arc::new(transport))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(RouterInner {
                transport,
                page_listener: RwLock::new(None),
                slot: Mutex::new(()),
                in_flight: AtomicBool::new(false),
                next_visit_id: AtomicU64::new(1),
                current_url: RwLock::new("/".to_string()),
            }),
        }
    }

    /// Router over the reqwest transport.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, TransportError> {
        Ok(Self::new(HttpTransport::new(settings)?))
    }

    /// Register the page-change listener, replacing any previous one.
    pub fn set_page_handler<F, Fut>(&self, handler: F)
    where
        F: Fn(PageChange) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let listener: PageListener =
            Arc::new(move |change: PageChange| -> BoxFuture<'static, ()> {
                Box::pin(handler(change))
            });
        *self.inner.page_listener.write() = Some(listener);
    }

    pub fn clear_page_handler(&self) {
        *self.inner.page_listener.write() = None;
    }

    /// Path + query of the last page this router loaded.
    pub fn current_url(&self) -> String {
        self.inner.current_url.read().clone()
    }

    pub fn set_current_url(&self, url: impl Into<String>) {
        *self.inner.current_url.write() = url.into();
    }

    /// Whether a request is outstanding right now.
    pub fn is_navigating(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Visit `url`. Failures are reported through the callbacks only.
    pub async fn visit(&self, url: &str, options: VisitOptions) {
        let _ = self.navigate(url, options).await;
    }

    /// Reload the current URL, preserving state and scroll.
    pub async fn reload(&self, options: VisitOptions) {
        let url = self.current_url();
        let options = options
            .with_preserve_state(true)
            .with_preserve_scroll(true);
        self.visit(&url, options).await;
    }

    pub async fn post(&self, url: &str, data: impl Into<RequestData>, options: VisitOptions) {
        self.visit(url, options.with_method(Method::Post).with_data(data))
            .await;
    }

    pub async fn put(&self, url: &str, data: impl Into<RequestData>, options: VisitOptions) {
        self.visit(url, options.with_method(Method::Put).with_data(data))
            .await;
    }

    pub async fn patch(&self, url: &str, data: impl Into<RequestData>, options: VisitOptions) {
        self.visit(url, options.with_method(Method::Patch).with_data(data))
            .await;
    }

    pub async fn delete(&self, url: &str, options: VisitOptions) {
        self.visit(url, options.with_method(Method::Delete)).await;
    }

    /// Run one visit and return how it ended.
    ///
    /// Drives the same callbacks as [`Router::visit`]; the outcome is returned
    /// in addition to, not instead of, the hooks.
    pub async fn navigate(&self, url: &str, options: VisitOptions) -> VisitOutcome {
        let VisitOptions {
            method,
            data,
            replace,
            preserve_state,
            preserve_scroll,
            only,
            headers,
            callbacks,
        } = options;
        let VisitCallbacks {
            on_before,
            on_start,
            mut on_progress,
            on_success,
            on_error,
            on_finish,
        } = callbacks;

        let visit_id = self.inner.next_visit_id.fetch_add(1, Ordering::SeqCst);

        if self.is_navigating() {
            tracing::debug!(visit_id, url, "Waiting for in-flight visit to settle");
        }
        let slot = self.inner.slot.lock().await;

        if let Some(on_before) = on_before {
            if !on_before() {
                tracing::debug!(visit_id, url, "Visit cancelled by on_before");
                return VisitOutcome::Cancelled;
            }
        }

        if let Some(on_start) = on_start {
            on_start();
        }

        let request = TransportRequest {
            url: url.to_string(),
            method,
            headers: headers::build(&headers, &only, preserve_state, preserve_scroll),
            data,
        };

        tracing::debug!(visit_id, method = %method, url, "Visit started");
        self.inner.in_flight.store(true, Ordering::SeqCst);
        let in_flight = scopeguard::guard(&self.inner.in_flight, |flag| {
            flag.store(false, Ordering::SeqCst);
        });
        let result = self.inner.transport.send(request).await;

        let responded = matches!(&result, Ok(_) | Err(TransportError::Http { .. }));
        if responded {
            if let Some(on_progress) = on_progress.as_mut() {
                on_progress(100.0);
            }
        }

        let result = result.map_err(VisitError::from).and_then(|response| {
            let value = response.body.into_json().ok_or_else(|| VisitError::InvalidPage {
                reason: "response body is not JSON".to_string(),
            })?;
            PageDescriptor::from_value(value).map_err(|e| VisitError::InvalidPage {
                reason: e.to_string(),
            })
        });

        let outcome = match result {
            Ok(page) => {
                let listener = self.inner.page_listener.read().clone();
                if let Some(listener) = listener {
                    listener(PageChange {
                        page: page.clone(),
                        replace,
                        preserve_state,
                        preserve_scroll,
                    })
                    .await;
                }
                self.set_current_url(page.url.clone());

                tracing::debug!(visit_id, component = %page.component, url = %page.url, "Visit succeeded");
                if let Some(on_success) = on_success {
                    on_success(&page);
                }
                VisitOutcome::Succeeded(page)
            }
            Err(err) => {
                tracing::error!(
                    visit_id,
                    url,
                    status = ?err.status(),
                    error = %err,
                    "Orbita visit failed"
                );
                let errors = err.error_map();
                if let Some(on_error) = on_error {
                    on_error(&errors);
                }
                VisitOutcome::Failed(err)
            }
        };

        drop(in_flight);
        drop(slot);

        if let Some(on_finish) = on_finish {
            on_finish();
        }

        outcome
    }
}
