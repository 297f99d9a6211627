//! Client configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::logger::{RequestLogger, TracingLogger};
use crate::transport::HttpExecutor;

/// Version of the FindFace REST API this client speaks.
pub const API_VERSION: u32 = 0;

/// FindFace API root. Every request path is resolved against it.
pub const ENDPOINT_URI: &str = "https://api.findface.pro/v0/";

/// FindFace client configuration.
///
/// Nothing is validated here; a missing access token is reported the first
/// time the client needs a connection.
#[derive(Clone)]
pub struct FindfaceConfig {
    /// API access token, sent as `Authorization: Token <access_token>`
    pub access_token: Option<String>,
    /// Outbound proxy URL
    pub proxy: Option<String>,
    /// Sink for request/response logging
    pub logger: Option<Arc<dyn RequestLogger>>,
    /// Replaces the default reqwest executor
    pub executor: Option<Arc<dyn HttpExecutor>>,
    /// API root, `ENDPOINT_URI` unless pointed elsewhere
    pub endpoint: String,
    /// Request timeout of the default executor
    pub timeout: Duration,
    /// Connect timeout of the default executor
    pub connect_timeout: Duration,
}

impl Default for FindfaceConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            proxy: None,
            logger: None,
            executor: None,
            endpoint: ENDPOINT_URI.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl FindfaceConfig {
    /// Create config with the given access token and defaults for everything else.
    pub fn with_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Self::default()
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let log_bodies = std::env::var("FINDFACE_LOG_BODIES")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            access_token: non_empty_var("FINDFACE_ACCESS_TOKEN"),
            proxy: non_empty_var("FINDFACE_PROXY"),
            logger: log_bodies
                .then(|| Arc::new(TracingLogger::default()) as Arc<dyn RequestLogger>),
            executor: None,
            endpoint: non_empty_var("FINDFACE_ENDPOINT").unwrap_or(defaults.endpoint),
            timeout: std::env::var("FINDFACE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            connect_timeout: std::env::var("FINDFACE_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn logger(&self) -> Option<&Arc<dyn RequestLogger>> {
        self.logger.as_ref()
    }

    pub fn executor(&self) -> Option<&Arc<dyn HttpExecutor>> {
        self.executor.as_ref()
    }

    /// Access token, if set and non-empty.
    pub(crate) fn usable_token(&self) -> Option<&str> {
        self.access_token().filter(|t| !t.trim().is_empty())
    }
}

impl fmt::Debug for FindfaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FindfaceConfig")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("proxy", &self.proxy)
            .field("logger", &self.logger.is_some())
            .field("executor", &self.executor.as_ref().map(|e| e.name()))
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "FINDFACE_ACCESS_TOKEN",
            "FINDFACE_PROXY",
            "FINDFACE_ENDPOINT",
            "FINDFACE_TIMEOUT_SECS",
            "FINDFACE_CONNECT_TIMEOUT_SECS",
            "FINDFACE_LOG_BODIES",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = FindfaceConfig::default();
        assert!(config.access_token().is_none());
        assert_eq!(config.endpoint, ENDPOINT_URI);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_endpoint_matches_api_version() {
        assert!(ENDPOINT_URI.ends_with(&format!("/v{}/", API_VERSION)));
        assert!(ENDPOINT_URI.starts_with("https://api.findface.pro/"));
    }

    #[test]
    fn test_usable_token_rejects_blank() {
        assert!(FindfaceConfig::with_token("").usable_token().is_none());
        assert!(FindfaceConfig::with_token("   ").usable_token().is_none());
        assert_eq!(FindfaceConfig::with_token("abc").usable_token(), Some("abc"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", FindfaceConfig::with_token("s3cr3t"));
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        std::env::set_var("FINDFACE_ACCESS_TOKEN", "env-token");
        std::env::set_var("FINDFACE_PROXY", "http://proxy.local:3128");
        std::env::set_var("FINDFACE_TIMEOUT_SECS", "90");
        std::env::set_var("FINDFACE_LOG_BODIES", "true");

        let config = FindfaceConfig::from_env();
        assert_eq!(config.access_token(), Some("env-token"));
        assert_eq!(config.proxy(), Some("http://proxy.local:3128"));
        assert_eq!(config.timeout, Duration::from_secs(90));
        assert!(config.logger().is_some());
        assert_eq!(config.endpoint, ENDPOINT_URI);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_handles_invalid_values() {
        clear_env();
        std::env::set_var("FINDFACE_ACCESS_TOKEN", "");
        std::env::set_var("FINDFACE_CONNECT_TIMEOUT_SECS", "not-a-number");

        let config = FindfaceConfig::from_env();
        assert!(config.access_token().is_none());
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert!(config.logger().is_none());
        clear_env();
    }
}
