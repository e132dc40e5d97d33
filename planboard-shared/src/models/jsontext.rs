/// Helpers for JSON stored as TEXT columns
///
/// Section rows keep list- and map-shaped values serialized as plain text.
/// Decoding is lenient: malformed or NULL stored text decodes to an empty
/// list or map rather than failing the read.

use serde_json::{Map, Value};

/// Decodes a stored text column into a JSON array
///
/// Returns an empty vector when the column is NULL, empty, malformed, or
/// holds a non-array value.
pub fn decode_list(raw: Option<&str>) -> Vec<Value> {
    match raw {
        Some(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        None => Vec::new(),
    }
}

/// Decodes a stored text column into a JSON object
///
/// Returns an empty map when the column is NULL, empty, malformed, or
/// holds a non-object value.
pub fn decode_map(raw: Option<&str>) -> Map<String, Value> {
    match raw {
        Some(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        None => Map::new(),
    }
}

/// Encodes a JSON value for storage in a text column
///
/// None values stay NULL in the database.
pub fn encode(value: Option<&Value>) -> Option<String> {
    value.map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_list_valid() {
        let items = decode_list(Some(r#"["a", "b", "c"]"#));
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], json!("a"));
    }

    #[test]
    fn test_decode_list_lenient() {
        assert!(decode_list(None).is_empty());
        assert!(decode_list(Some("")).is_empty());
        assert!(decode_list(Some("not json")).is_empty());
        assert!(decode_list(Some(r#"{"a": 1}"#)).is_empty());
    }

    #[test]
    fn test_decode_map_valid() {
        let map = decode_map(Some(r#"{"growth": ["expand"]}"#));
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("growth"));
    }

    #[test]
    fn test_decode_map_lenient() {
        assert!(decode_map(None).is_empty());
        assert!(decode_map(Some("[1, 2]")).is_empty());
        assert!(decode_map(Some("{broken")).is_empty());
    }

    #[test]
    fn test_encode() {
        let value = json!(["x"]);
        assert_eq!(encode(Some(&value)), Some(r#"["x"]"#.to_string()));
        assert_eq!(encode(None), None);
    }
}
