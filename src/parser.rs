//! JSON parser for stop datasets.

use serde_json::Value;
use thiserror::Error;

use crate::record::StopRecord;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset must be a JSON array, found {found}")]
    NotAnArray { found: &'static str },

    #[error("element {index} of the dataset is {found}, expected an object")]
    NotAnObject { index: usize, found: &'static str },
}

/// Decodes a JSON array of stop objects.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON, the top level is not an
/// array, or any element is not an object. Missing or mistyped keys inside
/// an object are not errors here.
pub fn parse_dataset(bytes: &[u8]) -> Result<Vec<StopRecord>, DatasetError> {
    let value: Value = serde_json::from_slice(bytes)?;

    let elements = match value {
        Value::Array(elements) => elements,
        other => {
            return Err(DatasetError::NotAnArray {
                found: kind(&other),
            });
        }
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| match element {
            Value::Object(fields) => Ok(StopRecord::new(fields)),
            other => Err(DatasetError::NotAnObject {
                index,
                found: kind(&other),
            }),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_array() {
        let records = parse_dataset(b"[]").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_dataset(b"[{\"bus_id\": ");
        assert!(matches!(result, Err(DatasetError::Json(_))));
    }

    #[test]
    fn test_parse_top_level_object_is_rejected() {
        let result = parse_dataset(br#"{"bus_id": 128}"#);
        assert!(matches!(
            result,
            Err(DatasetError::NotAnArray { found: "an object" })
        ));
    }

    #[test]
    fn test_parse_non_object_element_names_index() {
        let err = parse_dataset(br#"[{"bus_id": 128}, 7]"#).unwrap_err();
        assert!(matches!(err, DatasetError::NotAnObject { index: 1, .. }));
        assert_eq!(
            err.to_string(),
            "element 1 of the dataset is a number, expected an object"
        );
    }

    #[test]
    fn test_parse_keeps_mistyped_fields() {
        let records =
            parse_dataset(br#"[{"bus_id": "128", "stop_name": 5, "a_time": "8:00"}]"#).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bus_id(), None);
        assert_eq!(records[0].stop_name(), None);
        assert_eq!(records[0].a_time(), Some("8:00"));
    }
}
