//! Field entries → structured record.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Split `base[index]` into its parts. Anything else is a plain key.
pub fn parse_indexed_key(key: &str) -> Option<(&str, usize)> {
    let open = key.find('[')?;
    let inner = key.get(open + 1..)?.strip_suffix(']')?;
    let base = &key[..open];
    if base.is_empty() || inner.is_empty() || !inner.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((base, inner.parse().ok()?))
}

enum Slot {
    Scalar(String),
    Sequence(BTreeMap<usize, String>),
}

/// Decode form entries into an object.
///
/// `name[i]` entries collect into an array ordered by `i`, regardless of the
/// order they are encountered in; missing indices are dropped rather than
/// left as holes. Plain keys are assigned directly, later entries winning.
pub fn form_data_to_object<'a, I>(entries: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut slots: BTreeMap<String, Slot> = BTreeMap::new();

    for (key, value) in entries {
        match parse_indexed_key(key) {
            Some((base, index)) => {
                let mut items = match slots.remove(base) {
                    Some(Slot::Sequence(items)) => items,
                    _ => BTreeMap::new(),
                };
                items.insert(index, value.to_string());
                slots.insert(base.to_string(), Slot::Sequence(items));
            }
            None => {
                slots.insert(key.to_string(), Slot::Scalar(value.to_string()));
            }
        }
    }

    slots
        .into_iter()
        .map(|(key, slot)| {
            let value = match slot {
                Slot::Scalar(s) => Value::String(s),
                Slot::Sequence(items) => Value::Array(items.into_values().map(Value::String).collect()),
            };
            (key, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_indexed_keys() {
        assert_eq!(parse_indexed_key("tags[0]"), Some(("tags", 0)));
        assert_eq!(parse_indexed_key("tags[12]"), Some(("tags", 12)));
        assert_eq!(parse_indexed_key("tags"), None);
        assert_eq!(parse_indexed_key("tags[]"), None);
        assert_eq!(parse_indexed_key("tags[x]"), None);
        assert_eq!(parse_indexed_key("tags[-1]"), None);
        assert_eq!(parse_indexed_key("[0]"), None);
        assert_eq!(parse_indexed_key("items[0][name]"), None);
    }

    #[test]
    fn plain_keys_assign_directly() {
        let obj = form_data_to_object(vec![("name", "John"), ("email", "john@example.com")]);
        assert_eq!(
            Value::Object(obj),
            json!({"name": "John", "email": "john@example.com"})
        );
    }

    #[test]
    fn indexed_keys_follow_index_not_encounter_order() {
        let obj = form_data_to_object(vec![("tags[1]", "b"), ("name", "x"), ("tags[0]", "a")]);
        assert_eq!(obj["tags"], json!(["a", "b"]));
    }

    #[test]
    fn sparse_indices_are_compacted() {
        let obj = form_data_to_object(vec![("tags[5]", "c"), ("tags[0]", "a"), ("tags[2]", "b")]);
        assert_eq!(obj["tags"], json!(["a", "b", "c"]));
    }

    #[test]
    fn repeated_plain_key_keeps_last() {
        let obj = form_data_to_object(vec![("color", "red"), ("color", "blue")]);
        assert_eq!(obj["color"], json!("blue"));
    }

    #[test]
    fn non_numeric_brackets_stay_plain() {
        let obj = form_data_to_object(vec![("meta[key]", "v")]);
        assert_eq!(obj["meta[key]"], json!("v"));
    }

    #[test]
    fn empty_form_decodes_to_empty_object() {
        assert!(form_data_to_object(Vec::<(&str, &str)>::new()).is_empty());
    }
}
