//! Page host.
//!
//! An [`App`] mounts the initial page, then follows the router: every loaded
//! page has its component resolved and is swapped in together with it, so
//! the mounted props always belong to the mounted component.
//!
//! ```text
//! Router ──PageChange──→ App::handle_page_change
//!                           ├─ resolve component ──ok──→ mount (page, component)
//!                           │                     └─err─→ keep previous mount
//!                           └─ history push / replace
//! ```

pub mod history;
pub mod resolver;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use thiserror::Error;
use tokio::sync::watch;

use crate::page::{PageDescriptor, StartupError};
use crate::router::{PageChange, Router, VisitOptions};

pub use history::{History, MemoryHistory};
pub use resolver::{ComponentRegistry, ComponentResolver};

/// Raised when page context is requested outside a mounted app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("use_orbita must be used within an Orbita app")]
pub struct ConfigurationError;

/// What is on screen: a page and the component rendering it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mounted<C> {
    pub page: PageDescriptor,
    pub component: C,
}

/// Page context handed to rendered components.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub page: PageDescriptor,
    pub router: Router,
}

/// Context lookup for components. `None` means no app is mounted above.
pub fn use_orbita(context: Option<&AppContext>) -> Result<&AppContext, ConfigurationError> {
    context.ok_or(ConfigurationError)
}

pub struct App<C: Send + Sync + 'static> {
    inner: Arc<AppInner<C>>,
}

impl<C: Send + Sync + 'static> Clone for App<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct AppInner<C: Send + Sync + 'static> {
    router: Router,
    resolver: Arc<dyn ComponentResolver<Component = C>>,
    history: Arc<dyn History>,
    mounted: watch::Sender<Mounted<C>>,
    resolving: AtomicUsize,
}

impl<C> App<C>
where
    C: Clone + Send + Sync + 'static,
{
    /// Mount the page the server embedded in the host document.
    ///
    /// Fails when the embedded page is missing or malformed, or when its
    /// component cannot be resolved.
    pub async fn boot(
        initial_page: Option<&str>,
        resolver: impl ComponentResolver<Component = C> + 'static,
        history: impl History + 'static,
        router: Router,
    ) -> Result<Self, StartupError> {
        let page = PageDescriptor::from_host_document(initial_page)?;

        let component = resolver.resolve(&page.component).await.map_err(|source| {
            StartupError::ComponentResolution {
                component: page.component.clone(),
                source,
            }
        })?;

        tracing::info!(component = %page.component, url = %page.url, "Orbita app booted");
        router.set_current_url(page.url.clone());

        let (mounted, _) = watch::channel(Mounted { page, component });
        let inner = Arc::new(AppInner {
            router: router.clone(),
            resolver: Arc::new(resolver),
            history: Arc::new(history),
            mounted,
            resolving: AtomicUsize::new(0),
        });

        let weak: Weak<AppInner<C>> = Arc::downgrade(&inner);
        router.set_page_handler(move |change| {
            let weak = weak.clone();
            async move {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_page_change(change).await;
                }
            }
        });

        Ok(Self { inner })
    }

    pub fn router(&self) -> &Router {
        &self.inner.router
    }

    pub fn mounted(&self) -> Mounted<C> {
        self.inner.mounted.borrow().clone()
    }

    pub fn page(&self) -> PageDescriptor {
        self.inner.mounted.borrow().page.clone()
    }

    /// Receive every mount, for re-rendering.
    pub fn subscribe(&self) -> watch::Receiver<Mounted<C>> {
        self.inner.mounted.subscribe()
    }

    /// True while a component is being resolved.
    pub fn is_loading(&self) -> bool {
        self.inner.resolving.load(Ordering::SeqCst) > 0
    }

    pub fn context(&self) -> AppContext {
        AppContext {
            page: self.page(),
            router: self.inner.router.clone(),
        }
    }

    /// Back/forward navigation: reload whatever the history now points at.
    pub async fn pop_state(&self) {
        let location = self.inner.history.location();
        let options = VisitOptions::default()
            .with_replace(true)
            .with_preserve_state(true);
        self.inner.router.visit(&location, options).await;
    }
}

impl<C> AppInner<C>
where
    C: Clone + Send + Sync + 'static,
{
    async fn handle_page_change(&self, change: PageChange) {
        let PageChange { page, replace, .. } = change;

        self.resolving.fetch_add(1, Ordering::SeqCst);
        let resolved = self.resolver.resolve(&page.component).await;
        self.resolving.fetch_sub(1, Ordering::SeqCst);

        let url = page.url.clone();
        match resolved {
            Ok(component) => {
                tracing::debug!(component = %page.component, url = %page.url, "Mounting page");
                self.mounted.send_replace(Mounted { page, component });
            }
            Err(err) => {
                tracing::error!(component = %page.component, error = %err, "Failed to load component");
            }
        }

        if url != self.history.location() {
            if replace {
                self.history.replace(&url);
            } else {
                self.history.push(&url);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn use_orbita_outside_app_is_a_configuration_error() {
        let err = use_orbita(None).unwrap_err();
        assert_eq!(err.to_string(), "use_orbita must be used within an Orbita app");
    }
}
