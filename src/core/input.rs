//! Argument normalization for records handed to the facade.
//!
//! Callers may pass a structured mapping or its textual JSON form. Either
//! way the facade works on a field map whose values are coerced to text.

use crate::errors::{AppError, AppResult};
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub enum RecordInput {
    Structured(Map<String, Value>),
    Text(String),
}

impl From<Map<String, Value>> for RecordInput {
    fn from(map: Map<String, Value>) -> Self {
        RecordInput::Structured(map)
    }
}

impl From<String> for RecordInput {
    fn from(text: String) -> Self {
        RecordInput::Text(text)
    }
}

impl From<&str> for RecordInput {
    fn from(text: &str) -> Self {
        RecordInput::Text(text.to_string())
    }
}

impl From<Value> for RecordInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => RecordInput::Structured(map),
            Value::String(text) => RecordInput::Text(text),
            // not a record; parsing reports it
            other => RecordInput::Text(other.to_string()),
        }
    }
}

/// Field map of a record after normalization.
#[derive(Debug, Clone)]
pub struct Fields(Map<String, Value>);

impl RecordInput {
    pub fn into_fields(self) -> AppResult<Fields> {
        match self {
            RecordInput::Structured(map) => Ok(Fields(map)),
            RecordInput::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(AppError::InvalidRecord("empty record".into()));
                }
                match serde_json::from_str::<Value>(trimmed)? {
                    Value::Object(map) => Ok(Fields(map)),
                    _ => Err(AppError::InvalidRecord(
                        "record must be a JSON object".into(),
                    )),
                }
            }
        }
    }
}

impl Fields {
    /// Field value coerced to text. Missing and null fields become "".
    pub fn text(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}
