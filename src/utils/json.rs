//! JSON pointer lookups over provider payloads

use serde_json::Value;

/// First non-empty string at any of `pointers`, trimmed.
pub fn string_at<'a>(value: &'a Value, pointers: &[&str]) -> Option<&'a str> {
    pointers
        .iter()
        .filter_map(|p| value.pointer(p))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Task id at any of `pointers`, accepting strings and numbers.
pub fn task_id_at(value: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().filter_map(|p| value.pointer(p)).find_map(|v| match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_at_skips_blank_values() {
        let v = json!({"a": "", "b": {"c": "  hit "}, "n": 3});
        assert_eq!(string_at(&v, &["/a", "/n", "/b/c"]), Some("hit"));
        assert_eq!(string_at(&v, &["/missing"]), None);
    }

    #[test]
    fn test_task_id_accepts_numbers() {
        let v = json!({"id": "", "result": 1712345678});
        assert_eq!(task_id_at(&v, &["/id", "/result"]).as_deref(), Some("1712345678"));
        assert_eq!(task_id_at(&v, &["/missing"]), None);
    }
}
