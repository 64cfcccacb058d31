//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (body limit > 0)
//! - Check the upstream base URL is usable as a request target
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - A missing API key is not an error; the proxy reports it per request

use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("upstream.model must not be empty")]
    EmptyModel,

    #[error("upstream.api_version must not be empty")]
    EmptyApiVersion,

    #[error("upstream.base_url '{url}' is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("static_files.root must not be empty")]
    EmptyStaticRoot,

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.upstream.model.trim().is_empty() {
        errors.push(ValidationError::EmptyModel);
    }

    if config.upstream.api_version.trim().is_empty() {
        errors.push(ValidationError::EmptyApiVersion);
    }

    if let Err(reason) = check_base_url(&config.upstream.base_url) {
        errors.push(ValidationError::InvalidBaseUrl {
            url: config.upstream.base_url.clone(),
            reason,
        });
    }

    if config.static_files.root.trim().is_empty() {
        errors.push(ValidationError::EmptyStaticRoot);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}'", other)),
    }
    if url.cannot_be_a_base() {
        return Err("URL cannot be used as a base".to_string());
    }
    if url.query().is_some() {
        return Err("base URL must not carry a query string".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = ProxyConfig::default();
        config.upstream.model = "  ".into();
        config.upstream.base_url = "ftp://example.com".into();
        config.security.max_body_size = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::EmptyModel));
        assert!(errors.contains(&ValidationError::ZeroBodyLimit));
        assert!(matches!(errors[1], ValidationError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let mut config = ProxyConfig::default();
        config.upstream.base_url = "not a url".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("not a url"));
    }

    #[test]
    fn rejects_base_url_with_query() {
        let mut config = ProxyConfig::default();
        config.upstream.base_url = "http://localhost:1234/?key=abc".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn accepts_local_http_base_url() {
        let mut config = ProxyConfig::default();
        config.upstream.base_url = "http://127.0.0.1:9999".into();
        assert!(validate_config(&config).is_ok());
    }
}
