//! Structured visit results.
//!
//! The router reports to callers through callbacks, but every visit also
//! resolves to a [`VisitOutcome`] so the lifecycle can be inspected without
//! registering any hooks.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::page::PageDescriptor;
use crate::transport::{ResponseBody, TransportError};

/// Field name → single server message, as delivered to `on_error`.
pub type ErrorMap = BTreeMap<String, String>;

/// Key used for failures that are not field-level validation errors.
pub const GENERIC_ERROR_KEY: &str = "message";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

const VALIDATION_STATUS: u16 = 422;

/// Why a visit failed.
#[derive(Debug, Error)]
pub enum VisitError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A 2xx response whose body is not a page descriptor.
    #[error("Response is not a valid page: {reason}")]
    InvalidPage { reason: String },
}

impl VisitError {
    /// Error map handed to `on_error`.
    ///
    /// 422 responses yield the body's `errors` object; every other failure
    /// collapses to a single generic message.
    pub fn error_map(&self) -> ErrorMap {
        match self {
            VisitError::Transport(TransportError::Http { status, body })
                if *status == VALIDATION_STATUS =>
            {
                validation_errors(body)
            }
            _ => {
                let mut map = ErrorMap::new();
                map.insert(
                    GENERIC_ERROR_KEY.to_string(),
                    GENERIC_ERROR_MESSAGE.to_string(),
                );
                map
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            VisitError::Transport(err) => err.status(),
            VisitError::InvalidPage { .. } => None,
        }
    }
}

fn validation_errors(body: &ResponseBody) -> ErrorMap {
    let Some(Value::Object(errors)) = body.as_json().and_then(|v| v.get("errors")) else {
        return ErrorMap::new();
    };

    errors
        .iter()
        .filter_map(|(field, message)| {
            let message = match message {
                Value::String(s) => s.clone(),
                Value::Array(items) => items.first()?.as_str()?.to_string(),
                Value::Null => return None,
                other => other.to_string(),
            };
            Some((field.clone(), message))
        })
        .collect()
}

/// How a visit ended.
#[derive(Debug)]
pub enum VisitOutcome {
    /// `on_before` vetoed the visit; nothing was sent.
    Cancelled,
    Succeeded(PageDescriptor),
    Failed(VisitError),
}

impl VisitOutcome {
    pub fn page(&self) -> Option<&PageDescriptor> {
        match self {
            VisitOutcome::Succeeded(page) => Some(page),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&VisitError> {
        match self {
            VisitOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, VisitOutcome::Cancelled)
    }
}
