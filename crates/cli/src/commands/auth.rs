//! Auth session commands.
//!
//! Every command runs inside an [`AuthSession`] scope, the way a frontend
//! page runs inside its session provider. The token and cached user persist
//! in the session file between invocations.

use cms_starter_client::{AuthSession, ClientError, SessionScopeError, StorageError};
use cms_starter_core::User;
use thiserror::Error;

/// Errors that can occur during auth commands.
#[derive(Debug, Error)]
pub enum AuthCommandError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Scope(#[from] SessionScopeError),
}

/// Build the session, restoring any stored user.
pub fn session() -> Result<AuthSession, ClientError> {
    Ok(AuthSession::new(super::client()?))
}

/// Log in and persist the session.
pub async fn login(
    session: AuthSession,
    identifier: &str,
    password: &str,
) -> Result<(), AuthCommandError> {
    AuthSession::provide(session, async {
        let user = AuthSession::current()?.login(identifier, password).await?;
        tracing::info!(user_id = %user.id, "Logged in");
        print_user(&user);
        Ok(())
    })
    .await
}

/// Register a new end user and persist the session.
pub async fn register(
    session: AuthSession,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), AuthCommandError> {
    AuthSession::provide(session, async {
        let user = AuthSession::current()?
            .register(username, email, password)
            .await?;
        tracing::info!(user_id = %user.id, "Registered");
        print_user(&user);
        Ok(())
    })
    .await
}

/// Clear the stored session.
pub async fn logout(session: AuthSession) -> Result<(), AuthCommandError> {
    AuthSession::provide(session, async {
        AuthSession::current()?.logout()?;
        tracing::info!("Logged out");
        Ok(())
    })
    .await
}

/// Print the stored user, if any.
pub async fn whoami(session: AuthSession) -> Result<(), AuthCommandError> {
    AuthSession::provide(session, async {
        match AuthSession::current()?.user() {
            Some(user) => print_user(&user),
            None => {
                #[allow(clippy::print_stdout)]
                {
                    println!("Not logged in");
                }
            }
        }
        Ok(())
    })
    .await
}

#[allow(clippy::print_stdout)]
fn print_user(user: &User) {
    println!("{} <{}> (id {})", user.username, user.email, user.id);
}
