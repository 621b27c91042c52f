//! HTTP client for the CMS REST API.
//!
//! [`ApiClient::fetch`] is the single request path: it attaches the stored
//! bearer token, decodes JSON bodies and turns non-success statuses into
//! [`ClientError::Api`] with the best message the response offers. The CRUD
//! and auth helpers are thin typed layers on top.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use cms_starter_core::{
    AuthResponse, DataPayload, Envelope, LoginRequest, RegisterRequest, User,
};

use crate::error::{ClientError, StorageError};
use crate::query::QueryParams;
use crate::storage::{SessionStorage, TOKEN_KEY, USER_KEY};

/// Default backend origin.
pub const DEFAULT_API_URL: &str = "http://localhost:1337";

/// Per-request options merged over the defaults.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    /// Extra headers; these replace default headers of the same name.
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A successful response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    /// Response declared `application/json`.
    Json(Value),
    /// Any other content type, returned verbatim.
    Text(String),
}

impl ApiBody {
    /// Decode a JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::UnexpectedBody` for text bodies and
    /// `ClientError::Decode` if the JSON does not match `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        match self {
            Self::Json(value) => Ok(serde_json::from_value(value)?),
            Self::Text(_) => Err(ClientError::UnexpectedBody("expected a JSON response")),
        }
    }
}

/// Client for the CMS REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and the session
/// storage.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn SessionStorage>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the backend at `base_url` (scheme + host, e.g.
    /// `http://localhost:1337`).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if `base_url` does not parse.
    pub fn new(base_url: &str, storage: Arc<dyn SessionStorage>) -> Result<Self, ClientError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(base_url)?,
            storage,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn storage(&self) -> &dyn SessionStorage {
        self.storage.as_ref()
    }

    fn url(&self, endpoint: &str) -> Result<Url, ClientError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{endpoint}"))?)
    }

    /// Send a request to `endpoint` (path plus optional query, e.g.
    /// `/api/home?populate=%2A`).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` for non-success statuses, with the message
    /// taken from the body's `error.message`, else its `message`, else
    /// `API error: <code> <reason>`. Transport failures are
    /// `ClientError::Http`; undecodable JSON is `ClientError::Decode`.
    pub async fn fetch(&self, endpoint: &str, options: RequestOptions) -> Result<ApiBody, ClientError> {
        let url = self.url(endpoint)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.token()
            && let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}"))
        {
            headers.insert(AUTHORIZATION, value);
        }
        for (name, value) in &options.headers {
            headers.insert(name.clone(), value.clone());
        }

        let mut request = self
            .http
            .request(options.method.clone(), url.clone())
            .headers(headers);
        if let Some(body) = &options.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(error = %e, method = %options.method, %url, "API request failed");
        })?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let result = if is_json {
            let bytes = response.bytes().await?;
            let value: Value = serde_json::from_slice(&bytes)?;
            if status.is_success() {
                Ok(ApiBody::Json(value))
            } else {
                Err(ClientError::Api {
                    status: status.as_u16(),
                    message: error_message(&value).unwrap_or_else(|| generic_message(status)),
                })
            }
        } else {
            let text = response.text().await?;
            if status.is_success() {
                Ok(ApiBody::Text(text))
            } else {
                Err(ClientError::Api {
                    status: status.as_u16(),
                    message: generic_message(status),
                })
            }
        };

        if let Err(e) = &result {
            tracing::warn!(error = %e, method = %options.method, %url, "API request failed");
        }
        result
    }

    async fn fetch_typed<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        self.fetch(endpoint, options).await?.decode()
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// `GET /api/<resource>` for a collection type.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn get_collection<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &QueryParams,
    ) -> Result<Envelope<Vec<T>>, ClientError> {
        self.fetch_typed(&endpoint(resource, None, params), RequestOptions::default())
            .await
    }

    /// `GET /api/<resource>` for a single type. `data` is `None` when the
    /// singleton has no content yet.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn get_single_type<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &QueryParams,
    ) -> Result<Envelope<Option<T>>, ClientError> {
        self.fetch_typed(&endpoint(resource, None, params), RequestOptions::default())
            .await
    }

    /// `GET /api/<resource>/<id>`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn get_entry<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
        params: &QueryParams,
    ) -> Result<Envelope<T>, ClientError> {
        self.fetch_typed(&endpoint(resource, Some(id), params), RequestOptions::default())
            .await
    }

    /// `POST /api/<resource>` with `{ "data": ... }`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn create_entry<T: DeserializeOwned, D: Serialize + Sync>(
        &self,
        resource: &str,
        data: &D,
    ) -> Result<Envelope<T>, ClientError> {
        let body = serde_json::to_value(DataPayload { data })?;
        self.fetch_typed(
            &endpoint(resource, None, &QueryParams::default()),
            RequestOptions::new(Method::POST).with_body(body),
        )
        .await
    }

    /// `PUT /api/<resource>/<id>` with `{ "data": ... }`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn update_entry<T: DeserializeOwned, D: Serialize + Sync>(
        &self,
        resource: &str,
        id: &str,
        data: &D,
    ) -> Result<Envelope<T>, ClientError> {
        let body = serde_json::to_value(DataPayload { data })?;
        self.fetch_typed(
            &endpoint(resource, Some(id), &QueryParams::default()),
            RequestOptions::new(Method::PUT).with_body(body),
        )
        .await
    }

    /// `DELETE /api/<resource>/<id>`.
    ///
    /// Returns `None` when the server answers without a JSON body
    /// (`204 No Content`).
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn delete_entry<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
    ) -> Result<Option<Envelope<T>>, ClientError> {
        let body = self
            .fetch(
                &endpoint(resource, Some(id), &QueryParams::default()),
                RequestOptions::new(Method::DELETE),
            )
            .await?;
        match body {
            ApiBody::Json(_) => body.decode().map(Some),
            ApiBody::Text(_) => Ok(None),
        }
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in with email or username and persist the session.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`]; also `ClientError::Storage` if the session
    /// cannot be persisted.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = serde_json::to_value(LoginRequest {
            identifier: identifier.to_owned(),
            password: password.to_owned(),
        })?;
        let response: AuthResponse = self
            .fetch_typed(
                "/api/auth/local",
                RequestOptions::new(Method::POST).with_body(body),
            )
            .await?;
        self.persist(&response)?;
        Ok(response)
    }

    /// Register a user and persist the session.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::login`].
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let body = serde_json::to_value(RegisterRequest {
            username: username.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        })?;
        let response: AuthResponse = self
            .fetch_typed(
                "/api/auth/local/register",
                RequestOptions::new(Method::POST).with_body(body),
            )
            .await?;
        self.persist(&response)?;
        Ok(response)
    }

    fn persist(&self, response: &AuthResponse) -> Result<(), ClientError> {
        self.storage.set(TOKEN_KEY, &response.jwt)?;
        self.storage
            .set(USER_KEY, &serde_json::to_string(&response.user)?)?;
        Ok(())
    }

    /// Forget the persisted session. No network call.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage cannot be written.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)
    }

    /// The persisted user snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if storage cannot be read and
    /// `ClientError::Decode` if the snapshot is not a valid user.
    pub fn stored_user(&self) -> Result<Option<User>, ClientError> {
        self.storage
            .get(USER_KEY)?
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(ClientError::from)
    }

    /// The persisted user, or `None` if absent or unreadable.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.stored_user().ok().flatten()
    }

    /// The persisted bearer token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).ok().flatten()
    }

    /// Whether a bearer token is stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// `/api/<resource>[/<id>][?<query>]`
fn endpoint(resource: &str, id: Option<&str>, params: &QueryParams) -> String {
    let mut path = format!("/api/{resource}");
    if let Some(id) = id {
        path.push('/');
        path.push_str(&urlencoding::encode(id));
    }
    let query = params.to_query_string();
    if !query.is_empty() {
        path.push('?');
        path.push_str(&query);
    }
    path
}

/// `error.message`, else top-level `message`. Empty strings are skipped.
fn error_message(body: &Value) -> Option<String> {
    [body.pointer("/error/message"), body.get("message")]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|m| !m.is_empty())
        .map(str::to_owned)
}

fn generic_message(status: StatusCode) -> String {
    format!(
        "API error: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    )
    .trim_end()
    .to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_error_message_precedence() {
        let both = json!({ "error": { "message": "nested" }, "message": "top" });
        assert_eq!(error_message(&both).as_deref(), Some("nested"));

        let top = json!({ "message": "top" });
        assert_eq!(error_message(&top).as_deref(), Some("top"));

        let empty_nested = json!({ "error": { "message": "" }, "message": "top" });
        assert_eq!(error_message(&empty_nested).as_deref(), Some("top"));

        assert_eq!(error_message(&json!({ "error": { "status": 500 } })), None);
    }

    #[test]
    fn test_generic_message() {
        assert_eq!(
            generic_message(StatusCode::BAD_GATEWAY),
            "API error: 502 Bad Gateway"
        );
        assert_eq!(
            generic_message(StatusCode::from_u16(599).unwrap_or(StatusCode::IM_A_TEAPOT)),
            "API error: 599"
        );
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(endpoint("home", None, &QueryParams::default()), "/api/home");
        assert_eq!(
            endpoint("home", None, &QueryParams::populate_all()),
            "/api/home?populate=%2A"
        );
        assert_eq!(
            endpoint("articles", Some("a b"), &QueryParams::default()),
            "/api/articles/a%20b"
        );
    }

    #[test]
    fn test_text_body_does_not_decode() {
        let err = ApiBody::Text("<html>".to_owned())
            .decode::<Value>()
            .unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedBody(_)));
    }
}
