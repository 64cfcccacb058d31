//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::upstream::Credential;

/// Environment variable holding the upstream API key.
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable holding the listen port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding the model identifier.
pub const ENV_MODEL: &str = "GEMINI_MODEL";
/// Environment variable overriding the upstream base URL.
pub const ENV_BASE_URL: &str = "GEMINI_BASE_URL";
/// Environment variable overriding the static asset directory.
pub const ENV_STATIC_ROOT: &str = "STATIC_ROOT";
/// Environment variable naming a TOML config file.
pub const ENV_CONFIG_PATH: &str = "CHAT_PROXY_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: {reason}")]
    InvalidEnv { name: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file into a configuration without validating it.
pub fn read_config_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides on top of `config`.
///
/// `lookup` abstracts `std::env::var` so tests can feed a fixed map.
/// Empty values are treated as unset.
pub fn apply_env<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(key) = get(ENV_API_KEY) {
        config.upstream.api_key = Some(Credential::new(key));
    }

    if let Some(port) = get(ENV_PORT) {
        config.listener.port = port.trim().parse().map_err(|e| ConfigError::InvalidEnv {
            name: ENV_PORT,
            reason: format!("'{}' is not a valid port: {}", port, e),
        })?;
    }

    if let Some(model) = get(ENV_MODEL) {
        config.upstream.model = model;
    }

    if let Some(base_url) = get(ENV_BASE_URL) {
        config.upstream.base_url = base_url;
    }

    if let Some(root) = get(ENV_STATIC_ROOT) {
        config.static_files.root = root;
    }

    Ok(())
}

/// Load configuration: defaults, then the optional TOML file, then the
/// environment. The result is validated before it is returned.
pub fn load_config<F>(path: Option<&Path>, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => ProxyConfig::default(),
    };

    apply_env(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load configuration from the real process environment.
pub fn load_from_env(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    load_config(path, |name| std::env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = load_config(None, env(&[])).unwrap();
        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.upstream.model, "gemini-2.5-flash");
        assert!(config.upstream.api_key.is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = load_config(
            None,
            env(&[
                (ENV_API_KEY, "secret-key"),
                (ENV_PORT, "8088"),
                (ENV_MODEL, "gemini-2.0-pro"),
                (ENV_STATIC_ROOT, "public"),
            ]),
        )
        .unwrap();

        assert_eq!(config.listener.port, 8088);
        assert_eq!(config.upstream.model, "gemini-2.0-pro");
        assert_eq!(config.static_files.root, "public");
        assert_eq!(config.upstream.api_key.unwrap().expose(), "secret-key");
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let config = load_config(None, env(&[(ENV_API_KEY, ""), (ENV_PORT, "")])).unwrap();
        assert!(config.upstream.api_key.is_none());
        assert_eq!(config.listener.port, 3000);
    }

    #[test]
    fn whitespace_api_key_is_kept() {
        let config = load_config(None, env(&[(ENV_API_KEY, " ")])).unwrap();
        assert_eq!(config.upstream.api_key.unwrap().expose(), " ");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = load_config(None, env(&[(ENV_PORT, "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: ENV_PORT, .. }));
    }

    #[test]
    fn reads_toml_file_then_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[listener]
port = 4000

[upstream]
model = "gemini-file-model"
base_url = "http://127.0.0.1:1"

[security]
cors_enabled = false
"#
        )
        .unwrap();

        let config = load_config(Some(file.path()), env(&[(ENV_PORT, "5000")])).unwrap();
        assert_eq!(config.listener.port, 5000);
        assert_eq!(config.upstream.model, "gemini-file-model");
        assert_eq!(config.upstream.base_url, "http://127.0.0.1:1");
        assert!(!config.security.cors_enabled);
        assert_eq!(config.upstream.api_version, "v1beta");
    }

    #[test]
    fn invalid_file_values_fail_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[upstream]\nmodel = \"\"").unwrap();

        let err = load_config(Some(file.path()), env(&[])).unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::EmptyModel]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/nonexistent/chat-proxy.toml")), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
