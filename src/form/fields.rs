//! The live field collection of a form.
//!
//! A `FieldSet` stands in for the form element: an ordered list of named
//! controls, each with a current value and the default it resets to. The host
//! keeps it in sync with whatever inputs it renders.

use crate::transport::FormData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub default_value: String,
}

impl Field {
    /// A control whose current value is its default.
    pub fn new(name: impl Into<String>, default_value: impl Into<String>) -> Self {
        let default_value = default_value.into();
        Self {
            name: name.into(),
            value: default_value.clone(),
            default_value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<Field>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FieldSet::push`].
    pub fn with_field(mut self, name: impl Into<String>, default_value: impl Into<String>) -> Self {
        self.push(Field::new(name, default_value));
        self
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Insert at `position`, clamped to the end.
    pub fn insert(&mut self, position: usize, field: Field) {
        let position = position.min(self.fields.len());
        self.fields.insert(position, field);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// `(name, value)` pairs in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
    }

    pub fn to_form_data(&self) -> FormData {
        self.entries().collect()
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|f| f.value.as_str())
    }

    /// Set the value of the first control named `name`.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Remove and return every field matching `predicate`, with the position
    /// the first of them occupied.
    pub(crate) fn drain_matching(
        &mut self,
        mut predicate: impl FnMut(&Field) -> bool,
    ) -> (Option<usize>, Vec<Field>) {
        let mut anchor = None;
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.fields.len());

        for field in self.fields.drain(..) {
            if predicate(&field) {
                anchor.get_or_insert(kept.len());
                taken.push(field);
            } else {
                kept.push(field);
            }
        }

        self.fields = kept;
        (anchor, taken)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Restore every control to its default value.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value = field.default_value.clone();
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
