//! Permission action identifiers.
//!
//! Actions follow the `api::<api>.<content-type>.<operation>` convention, e.g.
//! `api::home.home.find` is "read the home singleton".

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when an action identifier is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionActionError {
    #[error("action must start with 'api::'")]
    MissingNamespace,
    #[error("action must have the form api::<api>.<type>.<operation>")]
    Malformed,
}

/// A permission action identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionAction(String);

impl PermissionAction {
    const NAMESPACE: &'static str = "api::";

    /// Build the action for `operation` on the content type `uid`
    /// (`api::<uid>.<operation>`).
    #[must_use]
    pub fn for_content_type(uid: &str, operation: &str) -> Self {
        Self(format!("{}{uid}.{operation}", Self::NAMESPACE))
    }

    /// `api::home.home.find`.
    #[must_use]
    pub fn home_find() -> Self {
        Self::for_content_type(crate::HomeContent::UID, "find")
    }

    /// Parse an action string.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace is missing or there are not exactly
    /// three non-empty dot-separated segments after it.
    pub fn parse(s: &str) -> Result<Self, PermissionActionError> {
        let rest = s
            .strip_prefix(Self::NAMESPACE)
            .ok_or(PermissionActionError::MissingNamespace)?;
        let segments: Vec<&str> = rest.split('.').collect();
        if segments.len() != 3 || segments.iter().any(|seg| seg.is_empty()) {
            return Err(PermissionActionError::Malformed);
        }
        Ok(Self(s.to_owned()))
    }

    /// Prefix shared by every action of a content type (`api::<uid>.`).
    #[must_use]
    pub fn content_type_prefix(uid: &str) -> String {
        format!("{}{uid}.", Self::NAMESPACE)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
