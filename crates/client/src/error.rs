//! Client error types.

use thiserror::Error;

/// Errors returned by [`ApiClient`](crate::ApiClient) operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with a non-success status.
    ///
    /// `message` is the most specific message the response offered.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request could not be sent or the response not read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL and endpoint do not form a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The response body was not of the expected kind.
    #[error("unexpected response: {0}")]
    UnexpectedBody(&'static str),

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Session storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// HTTP status for API errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message, or `fallback` if the error carries none.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_owned()
        } else {
            message
        }
    }
}

/// Errors from a [`SessionStorage`](crate::SessionStorage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session storage is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_message() {
        let err = ClientError::Api {
            status: 403,
            message: "Forbidden".to_owned(),
        };
        assert_eq!(err.to_string(), "Forbidden");
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_message_or_fallback() {
        let empty = ClientError::Api {
            status: 400,
            message: String::new(),
        };
        assert_eq!(empty.message_or("Login failed"), "Login failed");

        let unexpected = ClientError::UnexpectedBody("expected JSON");
        assert_eq!(
            unexpected.message_or("Login failed"),
            "unexpected response: expected JSON"
        );
    }
}
