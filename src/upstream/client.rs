//! Outbound HTTP call to the upstream API.
//!
//! # Responsibilities
//! - Issue exactly one POST per call, JSON in, JSON out
//! - Return the upstream status untouched, whatever it is
//! - Turn transport and decoding failures into [`ExchangeError`]
//!
//! # Design Decisions
//! - No timeout and no retries; the caller waits for the single attempt
//! - reqwest errors embed the request URL, which carries the API key, so it
//!   is stripped before the error and its causes are formatted

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;
use url::Url;

/// A completed exchange with the upstream: any status, JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Failure talking to the upstream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    /// The request could not be sent or the response could not be read.
    #[error("upstream request failed: {0}")]
    Transport(String),

    /// The upstream answered, but not with JSON.
    #[error("upstream returned a non-JSON body (status {status}): {reason}")]
    InvalidBody { status: StatusCode, reason: String },
}

/// Seam between the proxy handler and the network.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// POST `body` as JSON to `url` and decode the JSON reply.
    async fn post_json(&self, url: Url, body: &Value) -> Result<UpstreamResponse, ExchangeError>;
}

/// reqwest-backed [`UpstreamClient`].
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("chat-proxy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

/// Format a reqwest error with its whole source chain and no URL.
fn describe(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn post_json(&self, url: Url, body: &Value) -> Result<UpstreamResponse, ExchangeError> {
        // `.json()` sets `Content-Type: application/json`.
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(describe(e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ExchangeError::Transport(describe(e)))?;

        let body = serde_json::from_slice(&bytes).map_err(|e| ExchangeError::InvalidBody {
            status,
            reason: e.to_string(),
        })?;

        Ok(UpstreamResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn url(server: &MockServer, path: &str) -> Url {
        Url::parse(&server.url(path)).unwrap()
    }

    #[tokio::test]
    async fn relays_status_and_json_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat")
                    .header("content-type", "application/json")
                    .json_body(json!({"contents": []}));
                then.status(429).json_body(json!({"error": {"code": 429}}));
            })
            .await;

        let client = HttpUpstream::new().unwrap();
        let resp = client
            .post_json(url(&server, "/chat"), &json!({"contents": []}))
            .await
            .unwrap();

        assert_eq!(resp.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.body, json!({"error": {"code": 429}}));
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn non_json_body_is_invalid() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat");
                then.status(502).body("<html>Bad Gateway</html>");
            })
            .await;

        let client = HttpUpstream::new().unwrap();
        let err = client
            .post_json(url(&server, "/chat"), &json!({}))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExchangeError::InvalidBody { status, .. } if status == StatusCode::BAD_GATEWAY
        ));
    }

    #[tokio::test]
    async fn transport_error_keeps_cause_and_hides_the_url() {
        // Bind then drop to get a port nobody is listening on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpUpstream::new().unwrap();
        let target = Url::parse(&format!("http://{}/m:generateContent?key=top-secret", addr)).unwrap();
        let err = client.post_json(target, &json!({})).await.unwrap_err();

        assert!(matches!(err, ExchangeError::Transport(_)));
        let message = err.to_string();
        assert!(!message.contains("top-secret"));
        assert!(
            message.to_lowercase().contains("refused"),
            "cause missing from {message:?}"
        );
    }
}
