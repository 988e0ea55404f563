//! Input loading
//!
//! Reads a JSON file holding either a top-level array of objects or
//! newline-delimited objects. Parsing is delegated to `serde_json`;
//! this module only enforces the top-level shape contract: the input
//! must be a sequence of JSON objects, anything else is an input
//! shape error.

use crate::error::{Error, Result};
use crate::schema::json_kind;
use serde_json::Value;
use std::path::Path;

/// Read records from a file, auto-detecting JSON array vs. NDJSON.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Value>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_records(&text)
}

/// Parse records from JSON text.
///
/// A document whose first significant byte opens an array is parsed
/// as a whole; anything else is treated as newline-delimited JSON. A
/// single top-level object is therefore rejected: one object is not a
/// record sequence.
pub fn parse_records(text: &str) -> Result<Vec<Value>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        let value: Value = serde_json::from_str(trimmed)?;
        return records_from_value(value);
    }

    match serde_json::from_str::<Value>(trimmed) {
        // Parsed as one complete non-array document: wrong shape.
        Ok(value) => records_from_value(value),
        // Not one document; try line-delimited records.
        Err(_) => parse_ndjson(text),
    }
}

/// Validate an already-parsed top-level value as a record sequence.
pub fn records_from_value(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(records) => {
            for (idx, record) in records.iter().enumerate() {
                if !record.is_object() {
                    return Err(Error::input_shape(format!(
                        "record {idx} is not an object (found {})",
                        json_kind(record)
                    )));
                }
            }
            Ok(records)
        }
        Value::Object(_) => Err(Error::input_shape(
            "top-level value is a single object; expected an array of objects or NDJSON",
        )),
        other => Err(Error::input_shape(format!(
            "top-level value is {}; expected an array of objects or NDJSON",
            json_kind(&other)
        ))),
    }
}

fn parse_ndjson(text: &str) -> Result<Vec<Value>> {
    let mut records = Vec::new();

    for (line_idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line).map_err(|source| Error::JsonLine {
            line: line_idx + 1,
            source,
        })?;

        if !value.is_object() {
            return Err(Error::input_shape(format!(
                "line {} is not an object (found {})",
                line_idx + 1,
                json_kind(&value)
            )));
        }
        records.push(value);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_array_of_objects() {
        let records = parse_records(r#"[{"a": 1}, {"a": 2}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], json!({"a": 1}));
    }

    #[test]
    fn test_parse_ndjson() {
        let text = "{\"a\": 1}\n\n{\"a\": 2}\n{\"a\": 3}\n";
        let records = parse_records(text).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_single_object_is_rejected() {
        let err = parse_records(r#"{"a": 1}"#).unwrap_err();
        assert!(matches!(err, Error::InputShape { .. }));
        assert!(err.to_string().contains("single object"));
    }

    #[test]
    fn test_scalar_top_level_is_rejected() {
        let err = parse_records("42").unwrap_err();
        assert!(matches!(err, Error::InputShape { .. }));
    }

    #[test]
    fn test_array_with_non_object_element_is_rejected() {
        let err = parse_records(r#"[{"a": 1}, 7]"#).unwrap_err();
        assert!(err.to_string().contains("record 1 is not an object"));
    }

    #[test]
    fn test_ndjson_with_non_object_line_is_rejected() {
        let err = parse_records("{\"a\": 1}\n[1, 2]\n").unwrap_err();
        assert!(err.to_string().contains("line 2 is not an object"));
    }

    #[test]
    fn test_ndjson_parse_error_reports_line() {
        let err = parse_records("{\"a\": 1}\n{broken\n").unwrap_err();
        assert!(matches!(err, Error::JsonLine { line: 2, .. }));
    }

    #[test]
    fn test_malformed_array_is_parse_error() {
        let err = parse_records("[{\"a\": 1},").unwrap_err();
        assert!(matches!(err, Error::JsonParse(_)));
    }

    #[test]
    fn test_empty_input_yields_no_records() {
        assert!(parse_records("").unwrap().is_empty());
        assert!(parse_records("[]").unwrap().is_empty());
    }
}
