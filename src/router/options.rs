//! Visit configuration and lifecycle hooks.

use std::fmt;

use crate::page::PageDescriptor;
use crate::router::outcome::ErrorMap;
use crate::transport::{Method, RequestData};

pub type BeforeHook = Box<dyn FnOnce() -> bool + Send>;
pub type StartHook = Box<dyn FnOnce() + Send>;
pub type ProgressHook = Box<dyn FnMut(f64) + Send>;
pub type SuccessHook = Box<dyn FnOnce(&PageDescriptor) + Send>;
pub type ErrorHook = Box<dyn FnOnce(&ErrorMap) + Send>;
pub type FinishHook = Box<dyn FnOnce() + Send>;

/// Lifecycle hooks of one visit. Every hook runs at most once.
#[derive(Default)]
pub struct VisitCallbacks {
    /// Returning `false` cancels the visit before anything is sent.
    pub on_before: Option<BeforeHook>,
    pub on_start: Option<StartHook>,
    /// Upload progress in percent.
    pub on_progress: Option<ProgressHook>,
    pub on_success: Option<SuccessHook>,
    pub on_error: Option<ErrorHook>,
    /// Runs last, on success and on failure, but not on cancellation.
    pub on_finish: Option<FinishHook>,
}

impl fmt::Debug for VisitCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitCallbacks")
            .field("on_before", &self.on_before.is_some())
            .field("on_start", &self.on_start.is_some())
            .field("on_progress", &self.on_progress.is_some())
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}

/// Options for [`Router::visit`](crate::router::Router::visit).
#[derive(Debug, Default)]
pub struct VisitOptions {
    pub method: Method,
    pub data: RequestData,
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
    /// Signal only; interpreted by the rendering layer.
    pub preserve_state: bool,
    /// Signal only; interpreted by the rendering layer.
    pub preserve_scroll: bool,
    /// Components to reload in a partial reload.
    pub only: Vec<String>,
    pub headers: Vec<(String, String)>,
    pub callbacks: VisitCallbacks,
}

impl VisitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_data(mut self, data: impl Into<RequestData>) -> Self {
        self.data = data.into();
        self
    }

    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn with_preserve_state(mut self, preserve: bool) -> Self {
        self.preserve_state = preserve;
        self
    }

    pub fn with_preserve_scroll(mut self, preserve: bool) -> Self {
        self.preserve_scroll = preserve;
        self
    }

    pub fn with_only<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = components.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn on_before(mut self, hook: impl FnOnce() -> bool + Send + 'static) -> Self {
        self.callbacks.on_before = Some(Box::new(hook));
        self
    }

    pub fn on_start(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.callbacks.on_start = Some(Box::new(hook));
        self
    }

    pub fn on_progress(mut self, hook: impl FnMut(f64) + Send + 'static) -> Self {
        self.callbacks.on_progress = Some(Box::new(hook));
        self
    }

    pub fn on_success(mut self, hook: impl FnOnce(&PageDescriptor) + Send + 'static) -> Self {
        self.callbacks.on_success = Some(Box::new(hook));
        self
    }

    pub fn on_error(mut self, hook: impl FnOnce(&ErrorMap) + Send + 'static) -> Self {
        self.callbacks.on_error = Some(Box::new(hook));
        self
    }

    pub fn on_finish(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.callbacks.on_finish = Some(Box::new(hook));
        self
    }
}
