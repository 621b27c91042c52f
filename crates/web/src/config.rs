//! Web frontend configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `CMS_API_URL` - Backend origin (default: `http://localhost:1337`)
//! - `WEB_HOST` - Bind address (default: 127.0.0.1)
//! - `WEB_PORT` - Listen port (default: 5173)
//! - `WEB_ADMIN_URL` - Optional admin panel link shown in the navigation
//! - `WEB_RICH_TEXT` - Rich text policy: `raw`, `markdown` or `escaped`
//!   (default: `raw`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;

use cms_starter_client::api::DEFAULT_API_URL;

use crate::render::RichTextPolicy;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web frontend configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Backend origin for API calls and the reverse proxy
    pub api_url: Url,
    pub host: IpAddr,
    pub port: u16,
    /// Admin panel link for the navigation bar
    pub admin_url: Option<String>,
    pub rich_text: RichTextPolicy,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

impl WebConfig {
    /// Load configuration from environment variables (and `.env`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let invalid = |key: &str, e: &dyn std::fmt::Display| {
            ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())
        };

        let api_url = get("CMS_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
            .parse::<Url>()
            .map_err(|e| invalid("CMS_API_URL", &e))?;
        let host = get("WEB_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_owned())
            .parse::<IpAddr>()
            .map_err(|e| invalid("WEB_HOST", &e))?;
        let port = get("WEB_PORT")
            .unwrap_or_else(|| "5173".to_owned())
            .parse::<u16>()
            .map_err(|e| invalid("WEB_PORT", &e))?;
        let rich_text = get("WEB_RICH_TEXT")
            .map(|v| v.parse::<RichTextPolicy>())
            .transpose()
            .map_err(|e| invalid("WEB_RICH_TEXT", &e))?
            .unwrap_or_default();

        Ok(Self {
            api_url,
            host,
            port,
            admin_url: get("WEB_ADMIN_URL"),
            rich_text,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<WebConfig, ConfigError> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        WebConfig::from_lookup(|key| map.get(key).map(|v| (*v).to_owned()))
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:1337/");
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5173");
        assert_eq!(config.rich_text, RichTextPolicy::Raw);
        assert!(config.admin_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("CMS_API_URL", "https://cms.example.com"),
            ("WEB_PORT", "8080"),
            ("WEB_RICH_TEXT", "escaped"),
            ("WEB_ADMIN_URL", "https://cms.example.com/admin"),
        ])
        .unwrap();
        assert_eq!(config.api_url.host_str(), Some("cms.example.com"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.rich_text, RichTextPolicy::Escaped);
        assert_eq!(
            config.admin_url.as_deref(),
            Some("https://cms.example.com/admin")
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config(&[("WEB_RICH_TEXT", "html")]),
            Err(ConfigError::InvalidEnvVar(ref key, _)) if key == "WEB_RICH_TEXT"
        ));
        assert!(config(&[("CMS_API_URL", "not a url")]).is_err());
        assert!(config(&[("WEB_PORT", "99999")]).is_err());
    }
}
