//! Failure kinds of the proxy endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::http::response::error_envelope;
use crate::upstream::ExchangeError;

/// Message returned when no API key is configured.
pub const CONFIGURATION_MISSING_MESSAGE: &str =
    "Server API key not configured. Set the GEMINI_API_KEY environment variable.";

/// Message returned for any failed upstream exchange.
pub const EXCHANGE_FAILED_MESSAGE: &str = "Internal server error during Gemini API call.";

/// Errors the proxy handler can produce (converted to HTTP 500 responses).
///
/// Upstream 4xx/5xx answers are not errors; they are relayed as-is.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// No API key was available; nothing was sent upstream.
    #[error("upstream API key is not configured")]
    ConfigurationMissing,

    /// The single upstream call failed or returned something that is not JSON.
    #[error(transparent)]
    ExchangeFailed(#[from] ExchangeError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Message shown to the client. Never includes upstream details.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::ConfigurationMissing => CONFIGURATION_MISSING_MESSAGE,
            Self::ExchangeFailed(_) => EXCHANGE_FAILED_MESSAGE,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigurationMissing => "configuration_missing",
            Self::ExchangeFailed(_) => "exchange_failed",
        }
    }

    pub fn envelope(&self) -> Value {
        error_envelope(self.client_message())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.envelope())).into_response()
    }
}
