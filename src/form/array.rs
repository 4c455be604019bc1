//! Array fields encoded as sibling `base[index]` controls.
//!
//! Mutations take the array's controls out of the field set as an ordered
//! sequence, edit the sequence, and render it back with dense indices at the
//! position the array occupied.

use serde::Serialize;

use crate::form::decode::parse_indexed_key;
use crate::form::fields::{Field, FieldSet};

/// One element of an array field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrayEntry {
    /// Canonical key, `base[index]`.
    pub key: String,
    /// Name of the underlying control.
    pub name: String,
    pub value: String,
}

fn index_in(base: &str, name: &str) -> Option<usize> {
    match parse_indexed_key(name) {
        Some((b, index)) if b == base => Some(index),
        _ => None,
    }
}

/// Index-ordered entries of `base`, unfilled slots dropped.
pub fn get_fields(fields: &FieldSet, base: &str) -> Vec<ArrayEntry> {
    let mut slots = std::collections::BTreeMap::new();
    for field in fields.iter() {
        if let Some(index) = index_in(base, &field.name) {
            slots.insert(
                index,
                ArrayEntry {
                    key: format!("{}[{}]", base, index),
                    name: field.name.clone(),
                    value: field.value.clone(),
                },
            );
        }
    }
    slots.into_values().collect()
}

fn take(fields: &mut FieldSet, base: &str) -> (Option<usize>, Vec<(usize, Field)>) {
    let (anchor, taken) = fields.drain_matching(|f| index_in(base, &f.name).is_some());
    let mut items: Vec<(usize, Field)> = taken
        .into_iter()
        .filter_map(|f| index_in(base, &f.name).map(|i| (i, f)))
        .collect();
    items.sort_by_key(|(index, _)| *index);
    (anchor, items)
}

fn put(fields: &mut FieldSet, base: &str, anchor: Option<usize>, items: Vec<Field>) {
    let start = anchor.unwrap_or(fields.len());
    for (offset, mut field) in items.into_iter().enumerate() {
        field.name = format!("{}[{}]", base, offset);
        fields.insert(start + offset, field);
    }
}

/// Add `value` after the last element.
pub fn append(fields: &mut FieldSet, base: &str, value: &str) {
    let (anchor, items) = take(fields, base);
    let mut items: Vec<Field> = items.into_iter().map(|(_, f)| f).collect();
    let next = items.len();
    items.push(Field::new(format!("{}[{}]", base, next), value));
    put(fields, base, anchor, items);
}

/// Insert `value` at index 0, shifting every element up by one.
pub fn prepend(fields: &mut FieldSet, base: &str, value: &str) {
    let (anchor, items) = take(fields, base);
    let mut items: Vec<Field> = items.into_iter().map(|(_, f)| f).collect();
    items.insert(0, Field::new(format!("{}[0]", base), value));
    put(fields, base, anchor, items);
}

/// Delete the element stored at `base[index]` and close the gap.
///
/// Returns `false` (and leaves the field set untouched) when no such element exists.
pub fn remove(fields: &mut FieldSet, base: &str, index: usize) -> bool {
    if !fields.iter().any(|f| index_in(base, &f.name) == Some(index)) {
        return false;
    }

    let (anchor, items) = take(fields, base);
    let items = items
        .into_iter()
        .filter(|(i, _)| *i != index)
        .map(|(_, f)| f)
        .collect();
    put(fields, base, anchor, items);
    true
}

/// Swap the values of `base[from]` and `base[to]`; the controls stay where they are.
pub fn move_values(fields: &mut FieldSet, base: &str, from: usize, to: usize) -> bool {
    let from_name = format!("{}[{}]", base, from);
    let to_name = format!("{}[{}]", base, to);

    let (Some(from_value), Some(to_value)) = (
        fields.value(&from_name).map(str::to_string),
        fields.value(&to_name).map(str::to_string),
    ) else {
        return false;
    };

    if let Some(field) = fields.get_mut(&from_name) {
        field.value = to_value;
    }
    if let Some(field) = fields.get_mut(&to_name) {
        field.value = from_value;
    }
    true
}
