use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Client configuration
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base address
    pub api_base_url: String,
    /// Scale factor applied to page viewports before rasterizing
    pub render_scale: f32,
    /// Column hint used until the user changes it
    pub default_columns: u32,
    /// Serve an extraction from the cache instead of refetching an unchanged key
    pub reuse_cached_extractions: bool,
    /// Transport timeout; no retries are attempted
    pub request_timeout_secs: u64,
    /// Sent as `X-API-Key` on translation requests
    pub translation_api_key: Option<String>,
    /// Whether to show verbose logs
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            render_scale: 1.25,
            default_columns: 1,
            reuse_cached_extractions: true,
            request_timeout_secs: 60,
            translation_api_key: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(default.api_base_url),
            render_scale: std::env::var("RENDER_SCALE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.render_scale),
            default_columns: std::env::var("DEFAULT_COLUMNS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.default_columns),
            reuse_cached_extractions: std::env::var("REUSE_CACHED_EXTRACTIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.reuse_cached_extractions),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            translation_api_key: std::env::var("TRANSLATION_API_KEY").ok().or(default.translation_api_key),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::ParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::invalid("api_base_url", "must not be empty"));
        }
        if !(self.render_scale.is_finite() && self.render_scale > 0.0) {
            return Err(ConfigError::invalid(
                "render_scale",
                format!("must be positive, got {}", self.render_scale),
            ));
        }
        if self.default_columns < 1 {
            return Err(ConfigError::invalid("default_columns", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.render_scale, 1.25);
        assert_eq!(config.default_columns, 1);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            api_base_url = "http://backend:9000"
            default_columns = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "http://backend:9000");
        assert_eq!(config.default_columns, 2);
        assert!(config.reuse_cached_extractions);
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.default_columns = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.render_scale = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api_base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
