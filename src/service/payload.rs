//! Normalization of `set` input into the stored JSON text

use serde_json::Value;

use crate::json::is_json_text;

/// Data accepted by a write
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A string that may or may not already be JSON text
    Text(String),
    /// A structured value
    Json(Value),
}

impl Payload {
    /// Produce the JSON text to store.
    ///
    /// A string that parses as JSON is stored verbatim; any other string is
    /// stored as a JSON string literal. Structured values are serialized
    /// compactly.
    pub fn encode(&self) -> String {
        match self {
            Payload::Text(text) => {
                if is_json_text(text) {
                    text.clone()
                } else {
                    Value::String(text.clone()).to_string()
                }
            }
            Payload::Json(value) => value.to_string(),
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}
