//! Schema adapter contract.
//!
//! The form engine never looks at a validation library's own error types.
//! Adapters translate whatever the library reports into [`FieldErrors`].

use std::collections::BTreeMap;

use serde_json::Value;

/// Field name → ordered list of messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Verdict of one validation run.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// The (possibly transformed) data to submit.
    Valid(Value),
    Invalid(FieldErrors),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Validation::Invalid(errors) => Some(errors),
            Validation::Valid(_) => None,
        }
    }
}

/// Maps arbitrary input to a [`Validation`]. Must be pure.
pub trait SchemaAdapter: Send + Sync {
    fn validate(&self, data: &Value) -> Validation;
}

impl<F> SchemaAdapter for F
where
    F: Fn(&Value) -> Validation + Send + Sync,
{
    fn validate(&self, data: &Value) -> Validation {
        self(data)
    }
}

/// Adapter that accepts everything unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl SchemaAdapter for AcceptAll {
    fn validate(&self, data: &Value) -> Validation {
        Validation::Valid(data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn closures_are_adapters() {
        let adapter = |data: &Value| {
            if data.get("email").and_then(Value::as_str) == Some("") {
                let mut errors = FieldErrors::new();
                errors.insert("email".to_string(), vec!["Invalid input".to_string()]);
                Validation::Invalid(errors)
            } else {
                Validation::Valid(data.clone())
            }
        };

        let verdict = adapter.validate(&json!({"email": ""}));
        assert!(!verdict.is_valid());
        assert_eq!(verdict.errors().unwrap()["email"], vec!["Invalid input"]);

        assert!(adapter.validate(&json!({"email": "a@b.co"})).is_valid());
    }

    #[test]
    fn accept_all_passes_data_through() {
        let data = json!({"x": "1"});
        assert_eq!(AcceptAll.validate(&data), Validation::Valid(data));
    }
}
