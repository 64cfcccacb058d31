//! Upstream URL composition.

use url::Url;

use crate::config::UpstreamConfig;
use crate::upstream::Credential;

/// Error building an [`UpstreamTarget`] from configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid upstream base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Fixed endpoint the proxy forwards to: base URL, API version and model.
///
/// The full URL is `{base}/{version}/models/{model}:generateContent?key={key}`.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    base_url: Url,
    api_version: String,
    model: String,
}

impl UpstreamTarget {
    pub fn new(
        base_url: &str,
        api_version: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, TargetError> {
        let base_url =
            Url::parse(base_url).map_err(|e| TargetError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(TargetError::InvalidBaseUrl(format!(
                "'{}' cannot be a base",
                base_url
            )));
        }
        Ok(Self {
            base_url,
            api_version: api_version.into(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, TargetError> {
        Self::new(&config.base_url, &config.api_version, &config.model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request URL without the credential, safe to log.
    pub fn endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&self.api_version)
                .push("models")
                .push(&format!("{}:generateContent", self.model));
        }
        url
    }

    /// Request URL carrying the credential as the `key` query parameter.
    pub fn url_with_key(&self, credential: &Credential) -> Url {
        let mut url = self.endpoint();
        url.query_pairs_mut().append_pair("key", credential.expose());
        url
    }
}
