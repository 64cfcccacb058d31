//! The chat proxy: one JSON body in, one upstream call, status and body out.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::proxy::error::ProxyError;
use crate::upstream::{
    Credential, HttpUpstream, TargetError, UpstreamClient, UpstreamResponse, UpstreamTarget,
};

/// Forwards chat payloads to the upstream API with the server's key attached.
///
/// Built once at startup; every field is read-only afterwards, so a single
/// instance is shared by all in-flight requests.
#[derive(Clone)]
pub struct ProxyHandler {
    credential: Option<Credential>,
    target: UpstreamTarget,
    client: Arc<dyn UpstreamClient>,
}

impl ProxyHandler {
    pub fn new(
        credential: Option<Credential>,
        target: UpstreamTarget,
        client: Arc<dyn UpstreamClient>,
    ) -> Self {
        Self {
            credential: credential.filter(|c| !c.is_empty()),
            target,
            client,
        }
    }

    /// Build a handler from configuration with the given client.
    pub fn from_config(
        config: &UpstreamConfig,
        client: Arc<dyn UpstreamClient>,
    ) -> Result<Self, TargetError> {
        let target = UpstreamTarget::from_config(config)?;
        Ok(Self::new(config.api_key.clone(), target, client))
    }

    /// Build a handler from configuration with a reqwest client.
    pub fn with_http_client(
        config: &UpstreamConfig,
        client: HttpUpstream,
    ) -> Result<Self, TargetError> {
        Self::from_config(config, Arc::new(client))
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Forward `payload` upstream and return whatever came back.
    ///
    /// Any upstream status, 4xx and 5xx included, is `Ok`.
    pub async fn handle(&self, payload: &Value) -> Result<UpstreamResponse, ProxyError> {
        let Some(credential) = &self.credential else {
            tracing::error!("GEMINI_API_KEY is missing; refusing to call upstream");
            return Err(ProxyError::ConfigurationMissing);
        };

        let url = self.target.url_with_key(credential);

        match self.client.post_json(url, payload).await {
            Ok(response) => {
                tracing::debug!(
                    model = %self.target.model(),
                    status = %response.status,
                    "Upstream responded"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.target.endpoint(),
                    error = %e,
                    "Proxy error"
                );
                Err(ProxyError::ExchangeFailed(e))
            }
        }
    }

    /// [`handle`](Self::handle) with the error branch folded into the JSON envelope.
    pub async fn respond(&self, payload: &Value) -> (StatusCode, Value) {
        match self.handle(payload).await {
            Ok(UpstreamResponse { status, body }) => (status, body),
            Err(e) => (e.status(), e.envelope()),
        }
    }
}
