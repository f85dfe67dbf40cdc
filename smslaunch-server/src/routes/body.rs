//! Lenient JSON request bodies
//!
//! Handlers read the raw body after the session check so that an
//! unauthenticated caller always sees 401. Field values are coerced to
//! text: numbers and booleans are stringified, `null` and missing fields
//! become empty and are then reported by the regular field validation.

use axum::body::Bytes;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Parsed request body; anything that is not an object has no fields
#[derive(Debug, Default)]
pub struct Body {
    fields: Map<String, Value>,
}

impl Body {
    pub fn parse(raw: &Bytes) -> Result<Self, ApiError> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match serde_json::from_slice(raw) {
            Ok(Value::Object(fields)) => Ok(Self { fields }),
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected malformed request body");
                Err(ApiError::MalformedBody)
            }
        }
    }

    /// Field as text, empty when absent or null
    pub fn text(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }
}
