//! Envelopes returned by processors and by the connector endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable error codes of the connector and the process entry points.
pub mod error_codes {
    pub const INVALID_ACTION: &str = "INVALID_ACTION";
    pub const PROCESSOR_EXECUTION_FAILED: &str = "PROCESSOR_EXECUTION_FAILED";
    pub const EXCEPTION_CAUGHT: &str = "EXCEPTION_CAUGHT";
    pub const CONFIG_NOT_FOUND: &str = "CONFIG_NOT_FOUND";
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
    pub const DATABASE_INIT_FAILED: &str = "DATABASE_INIT_FAILED";
}

/// Error bound to a single form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrorEntry {
    pub id: String,
    pub msg: String,
}

impl FieldErrorEntry {
    pub fn new(id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            msg: msg.into(),
        }
    }
}

/// Processor response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessorResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldErrorEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
}

impl ProcessorResponse {
    pub fn success(message: impl Into<String>, object: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            object,
            ..Default::default()
        }
    }

    pub fn failure(message: impl Into<String>, errors: Vec<FieldErrorEntry>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors,
            ..Default::default()
        }
    }

    pub fn list(total: u64, results: Value) -> Self {
        Self {
            success: true,
            total: Some(total),
            results: Some(results),
            ..Default::default()
        }
    }
}

/// Connector reply when no processor got to run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorError {
    pub success: bool,
    pub message: String,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ConnectorError {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: error.to_string(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
