//! Base trait for intents.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (setting an error, resetting a form)
/// - Lifecycle events (submission started or finished)
/// - Server responses (validation errors)
pub trait Intent: Send + 'static {}
