//! JSON error envelope shared by every error the server produces.
//!
//! # Design Decisions
//! - Every API error, including extractor rejections, has the shape
//!   `{"error": {"message": "..."}}`, the same shape the upstream uses
//! - Messages are fixed strings; upstream internals never reach the client

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{"error": {"message": ...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
            },
        }
    }
}

/// Build the envelope as a JSON value.
pub fn error_envelope(message: &str) -> Value {
    serde_json::json!({ "error": { "message": message } })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let value = error_envelope("boom");
        assert_eq!(value, serde_json::json!({"error": {"message": "boom"}}));

        let parsed: ErrorEnvelope = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, ErrorEnvelope::new("boom"));
    }
}
