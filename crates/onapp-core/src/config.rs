//! Configuration structures for OnApp clients.
//!
//! This module provides the connection settings for an OnApp control panel,
//! either built in code or loaded from a YAML file:
//!
//! ```yaml
//! base_url: https://cloud.example.com
//! username: admin@example.com
//! api_key: 0123456789abcdef
//! request_timeout_secs: 45
//! ```

use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

/// API key used as the basic-auth password.
///
/// The value is redacted in `Debug` output and never serialized.
#[derive(Clone)]
pub struct ApiKey(Arc<SecretString>);

impl ApiKey {
    /// Wrap a raw key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(Arc::new(SecretString::from(key.into())))
    }

    /// Borrow the raw key for use in a request.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Connection settings for one OnApp control panel.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OnAppConfig {
    /// Control panel base URL
    #[validate(url)]
    pub base_url: String,

    /// Login used for basic authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// API key paired with `username`
    #[serde(default, skip_serializing)]
    pub api_key: Option<ApiKey>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of retry attempts for idempotent requests
    #[validate(range(min = 0, max = 10))]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

impl OnAppConfig {
    /// Create a new configuration for the given control panel URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            base_url: base_url.into(),
            username: None,
            api_key: None,
            tls_verify: default_tls_verify(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from YAML text and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a value is out of range.
    pub fn from_yaml_str(text: &str) -> Result<Self, Error> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Set the basic-auth credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.api_key = Some(ApiKey::new(api_key));
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_new() {
        let config = OnAppConfig::new("https://cloud.example.com").unwrap();
        assert_eq!(config.base_url, "https://cloud.example.com");
        assert!(config.tls_verify);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_retries, 3);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_config_invalid_url() {
        let result = OnAppConfig::new("not-a-url");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_builder() {
        let config = OnAppConfig::new("https://cloud.example.com")
            .unwrap()
            .with_credentials("admin", "secret-key")
            .with_tls_verify(false)
            .with_timeout(60)
            .with_max_retries(5);

        assert_eq!(config.username.as_deref(), Some("admin"));
        assert_eq!(config.api_key.as_ref().map(ApiKey::expose), Some("secret-key"));
        assert!(!config.tls_verify);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.max_retries, 5);
    }

    #[test]
    fn test_api_key_is_redacted() {
        let config = OnAppConfig::new("https://cloud.example.com")
            .unwrap()
            .with_credentials("admin", "hunter2");

        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("REDACTED"));

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("api_key"));
    }

    #[test]
    fn test_from_yaml_str_applies_defaults() {
        let config = OnAppConfig::from_yaml_str(
            "base_url: https://cloud.example.com\nusername: admin\napi_key: abc123\n",
        )
        .unwrap();

        assert_eq!(config.username.as_deref(), Some("admin"));
        assert_eq!(config.api_key.as_ref().map(ApiKey::expose), Some("abc123"));
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_retries, 3);
        assert!(config.tls_verify);
    }

    #[test]
    fn test_from_yaml_str_rejects_out_of_range() {
        let result = OnAppConfig::from_yaml_str(
            "base_url: https://cloud.example.com\nrequest_timeout_secs: 0\n",
        );
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_validation_failure_reports_config_error() {
        let err = OnAppConfig::from_yaml_str(
            "base_url: https://cloud.example.com\nmax_retries: 11\n",
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("max_retries"));

        let err = OnAppConfig::new("ftp//broken").unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_from_yaml_str_requires_base_url() {
        let result = OnAppConfig::from_yaml_str("username: admin\n");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url: http://onapp.internal:8080").unwrap();
        writeln!(file, "max_retries: 0").unwrap();

        let config = OnAppConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://onapp.internal:8080");
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_from_yaml_file_missing() {
        let result = OnAppConfig::from_yaml_file("/nonexistent/onapp.yml");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_validation_ranges() {
        let mut config = OnAppConfig::new("https://cloud.example.com").unwrap();
        config.request_timeout_secs = 301;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 30;
        config.max_retries = 11;
        assert!(config.validate().is_err());

        config.max_retries = 3;
        assert!(config.validate().is_ok());
    }
}
