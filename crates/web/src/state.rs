//! Application state shared across handlers.

use std::sync::Arc;

use cms_starter_client::{ApiClient, ClientError, MemoryStorage};

use crate::config::WebConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    client: ApiClient,
    http: reqwest::Client,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Server-side rendering fetches content anonymously, so the API client
    /// gets its own empty in-memory session storage.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if the API URL is unusable and
    /// `ClientError::Http` if the proxy client cannot be built.
    pub fn new(config: WebConfig) -> Result<Self, ClientError> {
        let client = ApiClient::new(config.api_url.as_str(), Arc::new(MemoryStorage::new()))?;
        // Redirects are relayed to the browser, not followed.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                http,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// API client used for server-side rendering.
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    /// Raw HTTP client used by the reverse proxy.
    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }
}
