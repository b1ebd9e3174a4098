//! Typed access to request properties. Values arrive either as JSON
//! numbers (request body) or as strings (query string).

use serde_json::Value;

use crate::shared::error::ProcessorError;

pub type Properties = serde_json::Map<String, Value>;

pub fn get_string(props: &Properties, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Integer property. Absent, null or empty means `None`; anything else that is
/// not an i32 is a validation error on that property.
pub fn get_i32(props: &Properties, key: &str) -> Result<Option<i32>, ProcessorError> {
    let invalid = || ProcessorError::validation(key, format!("\"{}\" must be an integer", key));
    match props.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

pub fn require_i32(props: &Properties, key: &str) -> Result<i32, ProcessorError> {
    get_i32(props, key)?
        .ok_or_else(|| ProcessorError::validation(key, format!("\"{}\" is required", key)))
}

pub fn get_u64(props: &Properties, key: &str) -> Result<Option<u64>, ProcessorError> {
    get_i32(props, key)?
        .map(|v| {
            u64::try_from(v).map_err(|_| {
                ProcessorError::validation(key, format!("\"{}\" must not be negative", key))
            })
        })
        .transpose()
}
