//! Defaulting policy for optional source fields.
//!
//! Every optional path in a source document resolves through one of the
//! helpers below, so the policy stays auditable in one place instead of
//! scattered inline fallbacks:
//!
//! - text fields default to `""`
//! - count fields default to `0`
//! - fixed-arity slots taken from list-valued fields default to `""` when
//!   the list is missing, empty, or shorter than the slot index

use serde_json::Value;

/// Walk a nested path of object keys. `None` as soon as a segment is
/// missing or the intermediate value is not an object.
pub fn nested<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

/// Text field at `path`, empty when missing or not a string.
pub fn text_at(value: &Value, path: &[&str]) -> String {
    nested(value, path)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

/// Count field at `path`, zero when missing or non-numeric. Sources are
/// inconsistent about integer vs. float representation; floats truncate.
pub fn count_at(value: &Value, path: &[&str]) -> i64 {
    nested(value, path)
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(0)
}

/// Fixed-arity slot from a list-valued field, empty when the list is
/// missing or has no entry at `index`. Never an index panic.
pub fn list_slot(value: &Value, path: &[&str], index: usize) -> String {
    nested(value, path)
        .and_then(Value::as_array)
        .and_then(|items| items.get(index))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_at_defaults_to_empty() {
        let doc = json!({"info": {"city": "Mumbai", "overs": 20}});
        assert_eq!(text_at(&doc, &["info", "city"]), "Mumbai");
        assert_eq!(text_at(&doc, &["info", "venue"]), "");
        // Wrong shape degrades to the default, not an error
        assert_eq!(text_at(&doc, &["info", "overs"]), "");
        assert_eq!(text_at(&doc, &["info", "city", "deeper"]), "");
    }

    #[test]
    fn count_at_accepts_integer_and_float_forms() {
        let doc = json!({"target": {"runs": 153, "overs": 19.0}});
        assert_eq!(count_at(&doc, &["target", "runs"]), 153);
        assert_eq!(count_at(&doc, &["target", "overs"]), 19);
        assert_eq!(count_at(&doc, &["target", "balls"]), 0);
        assert_eq!(count_at(&doc, &["missing", "runs"]), 0);
    }

    #[test]
    fn list_slot_never_indexes_out_of_range() {
        let doc = json!({"officials": {"umpires": ["A Umpire"]}});
        assert_eq!(list_slot(&doc, &["officials", "umpires"], 0), "A Umpire");
        assert_eq!(list_slot(&doc, &["officials", "umpires"], 1), "");
        assert_eq!(list_slot(&doc, &["officials", "referees"], 0), "");
    }
}
