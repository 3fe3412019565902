//! Diff generation for audit logging
//!
//! Produces field-path change descriptions such as
//! `monthly_values.march: 0 -> 12000` between two serialized entity states.

use serde_json::Value;

/// Fields that change on every write and carry no information in a diff
const IGNORED_FIELDS: &[&str] = &["updated_at"];

/// Summarize the changes between two entity states
///
/// Returns `None` when nothing but ignored bookkeeping fields changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = generate_detailed_diff(before, after, "");
    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

/// List every changed leaf, recursing into nested objects
pub fn generate_detailed_diff(before: &Value, after: &Value, prefix: &str) -> Vec<String> {
    let mut changes = Vec::new();

    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            for (key, before_val) in before_obj {
                if prefix.is_empty() && IGNORED_FIELDS.contains(&key.as_str()) {
                    continue;
                }
                let path = join_path(prefix, key);

                match after_obj.get(key) {
                    Some(after_val) if before_val == after_val => {}
                    Some(after_val) if before_val.is_object() && after_val.is_object() => {
                        changes.extend(generate_detailed_diff(before_val, after_val, &path));
                    }
                    Some(after_val) => changes.push(format!(
                        "{}: {} -> {}",
                        path,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    None => changes.push(format!("{}: {} -> (removed)", path, format_value(before_val))),
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) {
                    changes.push(format!(
                        "{}: (added) -> {}",
                        join_path(prefix, key),
                        format_value(after_val)
                    ));
                }
            }
        }
        _ => {
            if before != after {
                changes.push(format!(
                    "{}: {} -> {}",
                    prefix,
                    format_value(before),
                    format_value(after)
                ));
            }
        }
    }

    changes
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.chars().count() > 50 {
                format!("\"{}...\"", s.chars().take(47).collect::<String>())
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_month_change() {
        let before = json!({"description": "Rent", "monthly_values": {"march": 0, "april": 0}});
        let after = json!({"description": "Rent", "monthly_values": {"march": 12000, "april": 0}});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "monthly_values.march: 0 -> 12000");
    }

    #[test]
    fn test_updated_at_is_ignored() {
        let before = json!({"archived": false, "updated_at": "2025-01-01T00:00:00Z"});
        let after = json!({"archived": false, "updated_at": "2025-02-01T00:00:00Z"});

        assert!(generate_diff(&before, &after).is_none());
    }

    #[test]
    fn test_added_and_removed() {
        let before = json!({"a": 1});
        let after = json!({"b": "x"});

        let changes = generate_detailed_diff(&before, &after, "");
        assert!(changes.contains(&"a: 1 -> (removed)".to_string()));
        assert!(changes.contains(&"b: (added) -> \"x\"".to_string()));
    }
}
