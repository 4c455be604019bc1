//! Form engine.
//!
//! A [`Form`] owns the live field set of one form and its [`FormState`].
//! Submitting decodes the fields, validates them through a [`SchemaAdapter`]
//! and then either calls a local submit handler or posts to the server
//! through the shared [`Router`]. Failures never escape `submit`: they end up
//! in `errors` (and `on_error`) with `processing` reset.

pub mod adapter;
pub mod array;
pub mod decode;
pub mod fields;
pub mod schema;
pub mod state;

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_core::future::BoxFuture;
use parking_lot::Mutex;
use scopeguard::ScopeGuard;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::mvi::Reducer;
use crate::page::PageDescriptor;
use crate::router::{ErrorMap, Router, VisitOptions, VisitOutcome};
use crate::transport::Method;

pub use adapter::{AcceptAll, FieldErrors, SchemaAdapter, Validation};
pub use array::ArrayEntry;
pub use fields::{Field, FieldSet};
pub use schema::{FieldSchema, Schema};
pub use state::{FormIntent, FormReducer, FormState};

/// Local submit handler: receives the validated data and the form itself as
/// helpers (`set_field_error`, `set_errors`, `clear_errors`, `reset`, `submit`).
pub type SubmitHandler =
    Arc<dyn Fn(Value, Form) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

static FORM_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Construction options for a [`Form`].
#[derive(Clone)]
pub struct FormOptions {
    adapter: Arc<dyn SchemaAdapter>,
    on_submit: Option<SubmitHandler>,
}

impl FormOptions {
    pub fn new(adapter: impl SchemaAdapter + 'static) -> Self {
        Self {
            adapter: Arc::new(adapter),
            on_submit: None,
        }
    }

    pub fn on_submit<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Value, Form) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let handler: SubmitHandler = Arc::new(
            move |values: Value, form: Form| -> BoxFuture<'static, anyhow::Result<()>> {
                Box::pin(handler(values, form))
            },
        );
        self.on_submit = Some(handler);
        self
    }
}

/// Attributes to spread onto an input bound to a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldProps {
    pub name: String,
    #[serde(rename = "defaultValue", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(rename = "aria-invalid")]
    pub aria_invalid: bool,
    #[serde(rename = "aria-describedby", skip_serializing_if = "Option::is_none")]
    pub aria_describedby: Option<String>,
}

/// Handle to one mounted form. Clones share state.
#[derive(Clone)]
pub struct Form {
    inner: Arc<FormInner>,
}

struct FormInner {
    id: String,
    router: Router,
    adapter: Arc<dyn SchemaAdapter>,
    on_submit: Option<SubmitHandler>,
    fields: Mutex<FieldSet>,
    state: watch::Sender<FormState>,
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("id", &self.inner.id)
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

impl Form {
    /// Mount a form over `fields`.
    pub fn new(router: Router, fields: FieldSet, options: FormOptions) -> Self {
        let id = format!("form-{}", FORM_ID_COUNTER.fetch_add(1, Ordering::SeqCst) + 1);
        let (state, _) = watch::channel(FormState::default());

        Self {
            inner: Arc::new(FormInner {
                id,
                router,
                adapter: options.adapter,
                on_submit: options.on_submit,
                fields: Mutex::new(fields),
                state,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    // -- State ----------------------------------------------------------------

    pub fn state(&self) -> FormState {
        self.inner.state.borrow().clone()
    }

    pub fn errors(&self) -> FieldErrors {
        self.inner.state.borrow().errors.clone()
    }

    pub fn processing(&self) -> bool {
        self.inner.state.borrow().processing
    }

    pub fn has_errors(&self) -> bool {
        self.inner.state.borrow().has_errors()
    }

    /// Receive every state change, for re-rendering.
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.inner.state.subscribe()
    }

    fn dispatch(&self, intent: FormIntent) {
        self.inner.state.send_modify(|state| {
            *state = FormReducer::reduce(std::mem::take(state), intent);
        });
    }

    pub fn set_field_error(&self, name: impl Into<String>, message: impl Into<String>) {
        self.dispatch(FormIntent::SetFieldError {
            name: name.into(),
            message: message.into(),
        });
    }

    pub fn set_errors(&self, errors: FieldErrors) {
        self.dispatch(FormIntent::SetErrors(errors));
    }

    pub fn clear_errors(&self) {
        self.dispatch(FormIntent::ClearErrors);
    }

    /// Restore field defaults and clear errors and `processing`.
    pub fn reset(&self) {
        self.inner.fields.lock().reset();
        self.dispatch(FormIntent::Reset);
    }

    // -- Fields ---------------------------------------------------------------

    /// Snapshot of the live fields.
    pub fn fields(&self) -> FieldSet {
        self.inner.fields.lock().clone()
    }

    /// Mutate the live fields.
    pub fn with_fields<R>(&self, f: impl FnOnce(&mut FieldSet) -> R) -> R {
        f(&mut self.inner.fields.lock())
    }

    pub fn value(&self, name: &str) -> Option<String> {
        self.inner.fields.lock().value(name).map(str::to_string)
    }

    pub fn set_value(&self, name: &str, value: impl Into<String>) -> bool {
        self.inner.fields.lock().set_value(name, value)
    }

    /// Decode the current fields into a record.
    pub fn data(&self) -> Map<String, Value> {
        let fields = self.inner.fields.lock();
        decode::form_data_to_object(fields.entries())
    }

    pub fn get_field_props(&self, name: &str, default_value: Option<&str>) -> FieldProps {
        let invalid = self.inner.state.borrow().errors.contains_key(name);
        FieldProps {
            name: name.to_string(),
            default_value: default_value.map(str::to_string),
            aria_invalid: invalid,
            aria_describedby: invalid.then(|| format!("{}-{}-error", self.inner.id, name)),
        }
    }

    pub fn array_field(&self, name: impl Into<String>) -> ArrayField {
        ArrayField {
            form: self.clone(),
            base: name.into(),
        }
    }

    // -- Submission -------------------------------------------------------------

    /// Submit handler for the form element.
    pub fn handle_submit(&self) -> BoxFuture<'static, ()> {
        self.submit(None, VisitOptions::default())
    }

    /// Validate and submit.
    ///
    /// With a local handler and no `url`, the handler receives the validated
    /// data. With a `url`, the raw decoded data is posted through the router.
    pub fn submit(&self, url: Option<&str>, options: VisitOptions) -> BoxFuture<'static, ()> {
        let form = self.clone();
        let url = url.map(str::to_string);

        Box::pin(async move {
            // Clears `processing` on failure and when the future is dropped early.
            let pending = scopeguard::guard(form.clone(), |form| {
                form.dispatch(FormIntent::Finished);
            });
            match form.run_submit(url, options).await {
                Ok(()) => {
                    ScopeGuard::into_inner(pending);
                }
                Err(err) => {
                    tracing::error!(form_id = %form.id(), error = %err, "Form submission error");
                }
            }
        })
    }

    async fn run_submit(&self, url: Option<String>, options: VisitOptions) -> anyhow::Result<()> {
        let data = self.data();

        self.dispatch(FormIntent::SubmitStarted);

        let validated = match self.inner.adapter.validate(&Value::Object(data.clone())) {
            Validation::Valid(values) => Some(values),
            Validation::Invalid(errors) if !errors.is_empty() => {
                tracing::debug!(form_id = %self.id(), fields = errors.len(), "Client-side validation failed");
                self.dispatch(FormIntent::ValidationFailed(errors));
                return Ok(());
            }
            Validation::Invalid(_) => None,
        };

        match (&self.inner.on_submit, url) {
            (Some(handler), None) => {
                if let Some(values) = validated {
                    handler(values, self.clone()).await?;
                }
                self.dispatch(FormIntent::Finished);
            }
            (_, Some(url)) => self.submit_to_server(&url, data, options).await,
            (None, None) => {
                tracing::warn!(form_id = %self.id(), "Submit without handler or URL");
                self.dispatch(FormIntent::Finished);
            }
        }

        Ok(())
    }

    async fn submit_to_server(&self, url: &str, data: Map<String, Value>, mut options: VisitOptions) {
        let callbacks = &mut options.callbacks;
        let caller_error = callbacks.on_error.take();
        let caller_success = callbacks.on_success.take();
        let caller_finish = callbacks.on_finish.take();

        let form = self.clone();
        callbacks.on_error = Some(Box::new(move |errors: &ErrorMap| {
            let mapped = errors
                .iter()
                .map(|(field, message)| (field.clone(), vec![message.clone()]))
                .collect();
            form.dispatch(FormIntent::ServerRejected(mapped));
            if let Some(on_error) = caller_error {
                on_error(errors);
            }
        }));

        let form = self.clone();
        callbacks.on_success = Some(Box::new(move |page: &PageDescriptor| {
            form.dispatch(FormIntent::Finished);
            if let Some(on_success) = caller_success {
                on_success(page);
            }
        }));

        let form = self.clone();
        callbacks.on_finish = Some(Box::new(move || {
            form.dispatch(FormIntent::Finished);
            if let Some(on_finish) = caller_finish {
                on_finish();
            }
        }));

        let options = options.with_method(Method::Post).with_data(data);
        let outcome = self.inner.router.navigate(url, options).await;
        if let VisitOutcome::Cancelled = outcome {
            self.dispatch(FormIntent::Finished);
        }
    }
}

/// Helpers for one array field of a form.
#[derive(Debug, Clone)]
pub struct ArrayField {
    form: Form,
    base: String,
}

impl ArrayField {
    pub fn name(&self) -> &str {
        &self.base
    }

    pub fn append(&self, value: &str) {
        self.form
            .with_fields(|fields| array::append(fields, &self.base, value));
    }

    pub fn prepend(&self, value: &str) {
        self.form
            .with_fields(|fields| array::prepend(fields, &self.base, value));
    }

    pub fn remove(&self, index: usize) -> bool {
        self.form
            .with_fields(|fields| array::remove(fields, &self.base, index))
    }

    /// Swap the values at `from` and `to`.
    pub fn move_values(&self, from: usize, to: usize) -> bool {
        self.form
            .with_fields(|fields| array::move_values(fields, &self.base, from, to))
    }

    pub fn get_fields(&self) -> Vec<ArrayEntry> {
        self.form
            .with_fields(|fields| array::get_fields(fields, &self.base))
    }

    /// Current values in index order.
    pub fn values(&self) -> Vec<String> {
        self.get_fields().into_iter().map(|entry| entry.value).collect()
    }
}
