use std::env;

use thiserror::Error;
use url::Url;

use super::model::AppConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// Parses a configuration document. Call [`AppConfig::validate`] before use.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Checks the values serde cannot: non-empty host, positive counts and
    /// thresholds, and an absolute http(s) display endpoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        let probe = &self.probe;

        if probe.host.trim().is_empty() {
            return invalid("probe.host must not be empty".to_string());
        }
        if probe.host.starts_with('-') || probe.host.chars().any(char::is_whitespace) {
            return invalid(format!("probe.host '{}' is not a valid host", probe.host));
        }
        if probe.packet_count == 0 {
            return invalid("probe.packet_count must be at least 1".to_string());
        }
        if probe.polling_interval_seconds == 0 {
            return invalid("probe.polling_interval_seconds must be at least 1".to_string());
        }
        if probe.timeout_seconds == 0 {
            return invalid("probe.timeout_seconds must be at least 1".to_string());
        }

        let thresholds = &probe.thresholds;
        if !(thresholds.jitter_multiple.is_finite() && thresholds.jitter_multiple > 0.0) {
            return invalid(format!(
                "probe.thresholds.jitter_multiple must be positive, got {}",
                thresholds.jitter_multiple
            ));
        }
        if !(thresholds.latency_ceiling_ms.is_finite() && thresholds.latency_ceiling_ms > 0.0) {
            return invalid(format!(
                "probe.thresholds.latency_ceiling_ms must be positive, got {}",
                thresholds.latency_ceiling_ms
            ));
        }

        let display = &self.display;
        match Url::parse(&display.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return invalid(format!(
                    "display.endpoint must use http or https, got '{}'",
                    url.scheme()
                ));
            }
            Err(e) => return invalid(format!("display.endpoint '{}': {e}", display.endpoint)),
        }
        if display.row == 0 {
            return invalid("display.row must be at least 1".to_string());
        }
        if display.length == 0 {
            return invalid("display.length must be at least 1".to_string());
        }
        if display.timeout_seconds == 0 {
            return invalid("display.timeout_seconds must be at least 1".to_string());
        }

        Ok(())
    }

    /// Overrides file values with `PING_HOST` and `DISPLAY_ENDPOINT` when set.
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = env::var("PING_HOST") {
            log::info!("Using host from PING_HOST: {host}");
            self.probe.host = host;
        }
        if let Ok(endpoint) = env::var("DISPLAY_ENDPOINT") {
            log::info!("Using display endpoint from DISPLAY_ENDPOINT: {endpoint}");
            self.display.endpoint = endpoint;
        }
    }
}

/// Load the application configuration from a YAML file and environment variables.
/// This function reads the configuration file specified by the `CONFIG_FILE` environment variable
/// (defaulting to `config.yml`), parses it into an `AppConfig`, and overrides the probed host and
/// the display endpoint with `PING_HOST` and `DISPLAY_ENDPOINT` when those are set.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let config_file_location =
        env::var("CONFIG_FILE").unwrap_or_else(|_| "config.yml".to_string());
    log::info!("Loading configuration from {config_file_location}");

    let config_str =
        std::fs::read_to_string(&config_file_location).map_err(|source| ConfigError::Read {
            path: config_file_location.clone(),
            source,
        })?;

    let mut config = AppConfig::from_yaml(&config_str)?;
    config.apply_env_overrides();
    config.validate()?;

    Ok(config)
}
