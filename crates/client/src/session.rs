//! Observable authentication session.
//!
//! [`AuthSession`] owns the logged-in user, a loading flag and the last error
//! message, and publishes every change on a `watch` channel. A session is made
//! available to a task tree with [`AuthSession::provide`] and retrieved with
//! [`AuthSession::current`].

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

use cms_starter_core::User;

use crate::api::ApiClient;
use crate::error::{ClientError, StorageError};

tokio::task_local! {
    static CURRENT_SESSION: AuthSession;
}

/// [`AuthSession::current`] was called outside [`AuthSession::provide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionScopeError {
    #[error("AuthSession::current() must be called inside AuthSession::provide()")]
    OutsideProvider,
}

/// Snapshot of the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Auth session holder. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<AuthSessionInner>,
}

struct AuthSessionInner {
    client: ApiClient,
    state: watch::Sender<SessionState>,
}

impl AuthSession {
    /// Create a session, restoring the cached user from storage.
    ///
    /// An unreadable or corrupted cache clears storage and starts logged out.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let (state, _) = watch::channel(SessionState {
            loading: true,
            ..SessionState::default()
        });

        let user = match client.stored_user() {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable cached session");
                if let Err(e) = client.logout() {
                    tracing::warn!(error = %e, "Failed to clear session storage");
                }
                None
            }
        };

        state.send_modify(|s| {
            s.user = user;
            s.loading = false;
        });

        Self {
            inner: Arc::new(AuthSessionInner { client, state }),
        }
    }

    /// Run `future` with this session as the current one.
    pub async fn provide<F: Future>(session: Self, future: F) -> F::Output {
        CURRENT_SESSION.scope(session, future).await
    }

    /// The session provided to the current task.
    ///
    /// # Errors
    ///
    /// Returns `SessionScopeError::OutsideProvider` when called outside
    /// [`AuthSession::provide`].
    pub fn current() -> Result<Self, SessionScopeError> {
        CURRENT_SESSION
            .try_with(Clone::clone)
            .map_err(|_| SessionScopeError::OutsideProvider)
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    /// Log in and record the user.
    ///
    /// # Errors
    ///
    /// Returns the client error after recording its message in
    /// [`SessionState::error`].
    pub async fn login(&self, identifier: &str, password: &str) -> Result<User, ClientError> {
        self.begin();
        let result = self.inner.client.login(identifier, password).await;
        self.finish(result.map(|r| r.user), "Login failed")
    }

    /// Register and record the user.
    ///
    /// # Errors
    ///
    /// Returns the client error after recording its message in
    /// [`SessionState::error`].
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ClientError> {
        self.begin();
        let result = self.inner.client.register(username, email, password).await;
        self.finish(result.map(|r| r.user), "Registration failed")
    }

    /// Clear the in-memory user and persisted session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisted data could not be removed; the
    /// in-memory state is cleared regardless.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.inner.state.send_modify(|s| {
            s.user = None;
            s.error = None;
        });
        self.inner.client.logout()
    }

    fn begin(&self) {
        self.inner.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    fn finish(&self, result: Result<User, ClientError>, fallback: &str) -> Result<User, ClientError> {
        match result {
            Ok(user) => {
                self.inner.state.send_modify(|s| {
                    s.user = Some(user.clone());
                    s.loading = false;
                });
                Ok(user)
            }
            Err(e) => {
                let message = e.message_or(fallback);
                self.inner.state.send_modify(|s| {
                    s.error = Some(message);
                    s.loading = false;
                });
                Err(e)
            }
        }
    }
}
