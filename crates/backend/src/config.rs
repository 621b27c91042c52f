//! Backend configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CMS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `CMS_HOST` - Bind address (default: 127.0.0.1)
//! - `CMS_PORT` - Listen port (default: 1337)
//! - `CMS_ADMIN_EMAIL` - Email of the default administrator
//! - `CMS_ADMIN_PASSWORD` - Password of the default administrator
//! - `CMS_ADMIN_FIRSTNAME` - First name of the default administrator (default: Admin)
//! - `CMS_ADMIN_LASTNAME` - Last name of the default administrator (default: User)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//!
//! The default administrator is only created when both `CMS_ADMIN_EMAIL` and
//! `CMS_ADMIN_PASSWORD` are set and no administrator exists yet.

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Backend application configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Default administrator created by the bootstrap routine
    pub admin: AdminBootstrapConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Default administrator attributes.
///
/// `SecretString` keeps the password out of `Debug` output.
#[derive(Debug, Clone)]
pub struct AdminBootstrapConfig {
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub firstname: String,
    pub lastname: String,
}

impl Default for AdminBootstrapConfig {
    fn default() -> Self {
        Self {
            email: None,
            password: None,
            firstname: DEFAULT_ADMIN_FIRSTNAME.to_owned(),
            lastname: DEFAULT_ADMIN_LASTNAME.to_owned(),
        }
    }
}

const DEFAULT_ADMIN_FIRSTNAME: &str = "Admin";
const DEFAULT_ADMIN_LASTNAME: &str = "User";

impl AdminBootstrapConfig {
    /// Email and password, if both were supplied.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &SecretString)> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some((email.as_str(), password)),
            _ => None,
        }
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            email: non_empty(lookup("CMS_ADMIN_EMAIL")),
            password: non_empty(lookup("CMS_ADMIN_PASSWORD")).map(SecretString::from),
            firstname: non_empty(lookup("CMS_ADMIN_FIRSTNAME"))
                .unwrap_or_else(|| DEFAULT_ADMIN_FIRSTNAME.to_owned()),
            lastname: non_empty(lookup("CMS_ADMIN_LASTNAME"))
                .unwrap_or_else(|| DEFAULT_ADMIN_LASTNAME.to_owned()),
        }
    }
}

impl BackendConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("CMS_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("CMS_DATABASE_URL".to_owned()))?;

        let host = lookup("CMS_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_owned())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CMS_HOST".to_owned(), e.to_string()))?;
        let port = lookup("CMS_PORT")
            .unwrap_or_else(|| "1337".to_owned())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CMS_PORT".to_owned(), e.to_string()))?;

        Ok(Self {
            database_url,
            host,
            port,
            admin: AdminBootstrapConfig::from_lookup(&lookup),
            sentry_dsn: non_empty(lookup("SENTRY_DSN")),
            sentry_environment: non_empty(lookup("SENTRY_ENVIRONMENT")),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Treat empty variables (`CMS_ADMIN_EMAIL=`) as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            BackendConfig::from_lookup(lookup_from(&[("CMS_DATABASE_URL", "postgres://db/cms")]))
                .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:1337");
        assert_eq!(config.admin.firstname, "Admin");
        assert_eq!(config.admin.lastname, "User");
        assert!(config.admin.credentials().is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_database_url_fallback() {
        let config =
            BackendConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://fly/cms")]))
                .unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://fly/cms");
    }

    #[test]
    fn test_missing_database_url() {
        let err = BackendConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "CMS_DATABASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let err = BackendConfig::from_lookup(lookup_from(&[
            ("CMS_DATABASE_URL", "postgres://db/cms"),
            ("CMS_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CMS_PORT"));
    }

    #[test]
    fn test_admin_credentials_require_both() {
        let only_email = BackendConfig::from_lookup(lookup_from(&[
            ("CMS_DATABASE_URL", "postgres://db/cms"),
            ("CMS_ADMIN_EMAIL", "admin@example.com"),
        ]))
        .unwrap();
        assert!(only_email.admin.credentials().is_none());

        let both = BackendConfig::from_lookup(lookup_from(&[
            ("CMS_DATABASE_URL", "postgres://db/cms"),
            ("CMS_ADMIN_EMAIL", "admin@example.com"),
            ("CMS_ADMIN_PASSWORD", "Sup3rSecret"),
            ("CMS_ADMIN_FIRSTNAME", "Ada"),
        ]))
        .unwrap();
        let (email, password) = both.admin.credentials().unwrap();
        assert_eq!(email, "admin@example.com");
        assert_eq!(password.expose_secret(), "Sup3rSecret");
        assert_eq!(both.admin.firstname, "Ada");
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = BackendConfig::from_lookup(lookup_from(&[
            ("CMS_DATABASE_URL", "postgres://db/cms"),
            ("CMS_ADMIN_EMAIL", ""),
            ("CMS_ADMIN_PASSWORD", "Sup3rSecret"),
            ("CMS_ADMIN_LASTNAME", " "),
        ]))
        .unwrap();
        assert!(config.admin.credentials().is_none());
        assert_eq!(config.admin.lastname, "User");
    }

    #[test]
    fn test_debug_redacts_admin_password() {
        let config = BackendConfig::from_lookup(lookup_from(&[
            ("CMS_DATABASE_URL", "postgres://user:dbpass@db/cms"),
            ("CMS_ADMIN_EMAIL", "admin@example.com"),
            ("CMS_ADMIN_PASSWORD", "Sup3rSecret"),
        ]))
        .unwrap();
        let output = format!("{config:?}");
        assert!(output.contains("admin@example.com"));
        assert!(!output.contains("Sup3rSecret"));
        assert!(!output.contains("dbpass"));
    }
}
