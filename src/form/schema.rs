//! Declarative field rules implementing [`SchemaAdapter`].
//!
//! A small object schema for decoded form records: each field is a string or
//! an array of strings, optionally constrained. Unknown keys are stripped from
//! the validated output.
//!
//! ```
//! use orbita::form::schema::{FieldSchema, Schema};
//!
//! let schema = Schema::new()
//!     .field("name", FieldSchema::string().required())
//!     .field("email", FieldSchema::email())
//!     .field("tags", FieldSchema::array(FieldSchema::string()).optional());
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::form::adapter::{FieldErrors, SchemaAdapter, Validation};

pub const REQUIRED: &str = "Required";
pub const INVALID_INPUT: &str = "Invalid input";
pub const TOO_SHORT: &str = "Too short";
pub const TOO_LONG: &str = "Too long";
pub const INVALID_OPTION: &str = "Invalid option";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

/// A single constraint.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Non-empty string / non-empty array.
    Required,
    Email,
    /// Minimum character count (strings) or element count (arrays).
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
    OneOf(Vec<String>),
}

impl Rule {
    fn check_str(&self, value: &str) -> Option<&'static str> {
        let len = value.chars().count();
        match self {
            Rule::Required if value.is_empty() => Some(REQUIRED),
            Rule::Email if !email_regex().is_match(value) => Some(INVALID_INPUT),
            Rule::MinLength(min) if len < *min => Some(TOO_SHORT),
            Rule::MaxLength(max) if len > *max => Some(TOO_LONG),
            Rule::Pattern(re) if !re.is_match(value) => Some(INVALID_INPUT),
            Rule::OneOf(options) if !options.iter().any(|o| o == value) => Some(INVALID_OPTION),
            _ => None,
        }
    }

    fn check_len(&self, len: usize) -> Option<&'static str> {
        match self {
            Rule::Required if len == 0 => Some(REQUIRED),
            Rule::MinLength(min) if len < *min => Some(TOO_SHORT),
            Rule::MaxLength(max) if len > *max => Some(TOO_LONG),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum Kind {
    String,
    Array(Box<FieldSchema>),
}

/// Rules for one field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    kind: Kind,
    rules: Vec<Rule>,
    optional: bool,
}

impl FieldSchema {
    pub fn string() -> Self {
        Self {
            kind: Kind::String,
            rules: Vec::new(),
            optional: false,
        }
    }

    pub fn email() -> Self {
        Self::string().rule(Rule::Email)
    }

    /// Array of elements, each validated against `element`.
    pub fn array(element: FieldSchema) -> Self {
        Self {
            kind: Kind::Array(Box::new(element)),
            rules: Vec::new(),
            optional: false,
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn required(self) -> Self {
        self.rule(Rule::Required)
    }

    pub fn min_len(self, min: usize) -> Self {
        self.rule(Rule::MinLength(min))
    }

    pub fn max_len(self, max: usize) -> Self {
        self.rule(Rule::MaxLength(max))
    }

    pub fn one_of<I, S>(self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule(Rule::OneOf(options.into_iter().map(Into::into).collect()))
    }

    pub fn pattern(self, pattern: &str) -> Result<Self, regex::Error> {
        Ok(self.rule(Rule::Pattern(Regex::new(pattern)?)))
    }

    /// The field may be absent.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn check(&self, value: Option<&Value>, messages: &mut Vec<String>) {
        let value = match value {
            None | Some(Value::Null) => {
                if !self.optional {
                    messages.push(REQUIRED.to_string());
                }
                return;
            }
            Some(value) => value,
        };

        match (&self.kind, value) {
            (Kind::String, Value::String(s)) => {
                messages.extend(self.rules.iter().filter_map(|r| r.check_str(s)).map(String::from));
            }
            (Kind::Array(element), Value::Array(items)) => {
                messages.extend(
                    self.rules
                        .iter()
                        .filter_map(|r| r.check_len(items.len()))
                        .map(String::from),
                );
                for item in items {
                    element.check(Some(item), messages);
                }
            }
            // A single control named like an array field decodes to a string.
            (Kind::Array(element), Value::String(_)) => {
                messages.extend(self.rules.iter().filter_map(|r| r.check_len(1)).map(String::from));
                element.check(Some(value), messages);
            }
            _ => messages.push(INVALID_INPUT.to_string()),
        }
    }

    fn normalize(&self, value: &Value) -> Value {
        match (&self.kind, value) {
            (Kind::Array(_), Value::String(_)) => Value::Array(vec![value.clone()]),
            _ => value.clone(),
        }
    }
}

/// Object schema over decoded form records.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: BTreeMap<String, FieldSchema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.fields.insert(name.into(), schema);
        self
    }
}

impl SchemaAdapter for Schema {
    fn validate(&self, data: &Value) -> Validation {
        let empty = Map::new();
        let object = data.as_object().unwrap_or(&empty);

        let mut errors = FieldErrors::new();
        let mut output = Map::new();

        for (name, schema) in &self.fields {
            let value = object.get(name);
            let mut messages = Vec::new();
            schema.check(value, &mut messages);

            if messages.is_empty() {
                if let Some(value) = value.filter(|v| !v.is_null()) {
                    output.insert(name.clone(), schema.normalize(value));
                }
            } else {
                errors.insert(name.clone(), messages);
            }
        }

        if errors.is_empty() {
            Validation::Valid(Value::Object(output))
        } else {
            Validation::Invalid(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signup() -> Schema {
        Schema::new()
            .field("name", FieldSchema::string())
            .field("email", FieldSchema::email())
            .field("tags", FieldSchema::array(FieldSchema::string()).optional())
    }

    #[test]
    fn invalid_email_is_reported_under_its_field() {
        let verdict = signup().validate(&json!({"name": "", "email": "invalid"}));
        let errors = verdict.errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["email"], vec![INVALID_INPUT]);
    }

    #[test]
    fn missing_required_field() {
        let verdict = signup().validate(&json!({"email": "john@example.com"}));
        assert_eq!(verdict.errors().unwrap()["name"], vec![REQUIRED]);
    }

    #[test]
    fn valid_data_strips_unknown_keys() {
        let verdict = signup().validate(&json!({
            "name": "John",
            "email": "john@example.com",
            "tags": ["react", "preact"],
            "newTag": ""
        }));
        assert_eq!(
            verdict,
            Validation::Valid(json!({
                "name": "John",
                "email": "john@example.com",
                "tags": ["react", "preact"]
            }))
        );
    }

    #[test]
    fn rules_accumulate_messages() {
        let schema = Schema::new().field(
            "code",
            FieldSchema::string()
                .required()
                .min_len(3)
                .pattern(r"^\d+$")
                .unwrap(),
        );
        let verdict = schema.validate(&json!({"code": ""}));
        assert_eq!(
            verdict.errors().unwrap()["code"],
            vec![REQUIRED, TOO_SHORT, INVALID_INPUT]
        );
    }

    #[test]
    fn array_length_and_elements_are_checked() {
        let schema = Schema::new().field(
            "tags",
            FieldSchema::array(FieldSchema::string().max_len(3)).min_len(1),
        );

        let verdict = schema.validate(&json!({"tags": []}));
        assert_eq!(verdict.errors().unwrap()["tags"], vec![TOO_SHORT]);

        let verdict = schema.validate(&json!({"tags": ["ok", "toolong"]}));
        assert_eq!(verdict.errors().unwrap()["tags"], vec![TOO_LONG]);
    }

    #[test]
    fn single_string_is_promoted_to_array() {
        let schema = Schema::new().field("tags", FieldSchema::array(FieldSchema::string()));
        let verdict = schema.validate(&json!({"tags": "solo"}));
        assert_eq!(verdict, Validation::Valid(json!({"tags": ["solo"]})));
    }

    #[test]
    fn one_of_rejects_unknown_option() {
        let schema = Schema::new().field("role", FieldSchema::string().one_of(["admin", "member"]));
        assert!(schema.validate(&json!({"role": "member"})).is_valid());
        assert_eq!(
            schema.validate(&json!({"role": "root"})).errors().unwrap()["role"],
            vec![INVALID_OPTION]
        );
    }

    #[test]
    fn wrong_type_is_invalid_input() {
        let schema = Schema::new().field("name", FieldSchema::string());
        assert_eq!(
            schema.validate(&json!({"name": 42})).errors().unwrap()["name"],
            vec![INVALID_INPUT]
        );
    }
}
