//! CLI command implementations.

pub mod auth;
pub mod home;
pub mod migrate;

use std::sync::Arc;

use cms_starter_client::{ApiClient, ClientError, FileStorage};

/// Session file used when `CMS_SESSION_FILE` is unset.
const DEFAULT_SESSION_FILE: &str = ".cms-session.json";

/// Build an API client that persists its session in the session file.
pub fn client() -> Result<ApiClient, ClientError> {
    let api_url = std::env::var("CMS_API_URL")
        .unwrap_or_else(|_| cms_starter_client::api::DEFAULT_API_URL.to_owned());
    let session_file =
        std::env::var("CMS_SESSION_FILE").unwrap_or_else(|_| DEFAULT_SESSION_FILE.to_owned());

    ApiClient::new(&api_url, Arc::new(FileStorage::new(session_file)))
}
