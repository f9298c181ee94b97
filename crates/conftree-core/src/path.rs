//! Dotted path lookup inside parsed values.

use serde_json::Value;

use crate::Object;

/// Get the value at a dot-separated path inside an object.
///
/// Object members are addressed by key and array elements by decimal index.
/// Returns `None` as soon as a segment is missing or the current value
/// cannot be indexed.
pub fn resolve_path<'a>(data: &'a Object, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = data.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Object {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    #[test]
    fn test_nested_lookup() {
        let data = object(json!({"core": {"port": 4010, "host": "1.1.1.1"}}));
        assert_eq!(resolve_path(&data, "core.port"), Some(&json!(4010)));
        assert_eq!(resolve_path(&data, "core"), Some(&data["core"]));
    }

    #[test]
    fn test_missing_segment() {
        let data = object(json!({"core": {"port": 4010}}));
        assert_eq!(resolve_path(&data, "core.host"), None);
        assert_eq!(resolve_path(&data, "edge.port"), None);
    }

    #[test]
    fn test_scalar_not_indexable() {
        let data = object(json!({"core": {"port": 4010}}));
        assert_eq!(resolve_path(&data, "core.port.value"), None);
    }

    #[test]
    fn test_array_index() {
        let data = object(json!({"hosts": ["a", {"name": "b"}]}));
        assert_eq!(resolve_path(&data, "hosts.0"), Some(&json!("a")));
        assert_eq!(resolve_path(&data, "hosts.1.name"), Some(&json!("b")));
        assert_eq!(resolve_path(&data, "hosts.2"), None);
        assert_eq!(resolve_path(&data, "hosts.first"), None);
    }

    #[test]
    fn test_null_is_a_value() {
        let data = object(json!({"proxy": null}));
        assert_eq!(resolve_path(&data, "proxy"), Some(&Value::Null));
        assert_eq!(resolve_path(&data, "proxy.url"), None);
    }
}
