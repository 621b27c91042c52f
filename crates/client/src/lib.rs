//! CMS Starter API client.
//!
//! - [`query`] formats query strings in the CMS bracket notation
//! - [`api`] wraps HTTP requests, CRUD helpers and local auth
//! - [`storage`] persists the session token and cached user
//! - [`session`] holds the observable auth state for a frontend
//! - [`resource`] fetches a single-type resource exactly once

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod error;
pub mod query;
pub mod resource;
pub mod session;
pub mod storage;

pub use api::{ApiBody, ApiClient, RequestOptions};
pub use error::{ClientError, StorageError};
pub use query::{Populate, QueryParams, format_query};
pub use resource::{ResourceState, SingleTypeResource, home_resource};
pub use session::{AuthSession, SessionScopeError, SessionState};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
