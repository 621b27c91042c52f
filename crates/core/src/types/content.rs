//! The `home` singleton content type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::HomeId;

/// Stored home page content as served by `GET /api/home`.
///
/// Field names follow the CMS wire format: attribute names are kept as
/// modeled (`welcome_text`), system fields are camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeContent {
    pub id: HomeId,
    /// Opaque identifier assigned by the CMS.
    #[serde(rename = "documentId")]
    pub document_id: String,
    pub welcome_text: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Rich text (markdown or HTML) authored in the CMS.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
}

impl HomeContent {
    /// Content type uid (`<api>.<type>`).
    pub const UID: &'static str = "home.home";

    /// REST resource path under `/api`.
    pub const RESOURCE: &'static str = "home";
}

/// Writable attributes of the home singleton (`PUT /api/home` payload).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeInput {
    pub welcome_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl HomeInput {
    /// The sample record written by the backend bootstrap.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            welcome_text: "Welcome to Our Website".to_owned(),
            subtitle: Some("Built with a headless CMS and a Rust frontend".to_owned()),
            content: Some(
                "## Getting Started\n\nThis is a sample home page created during the bootstrap process.\n\nYou can edit this content through the CMS API."
                    .to_owned(),
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_home_content_wire_format() {
        let json = serde_json::json!({
            "id": 1,
            "documentId": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
            "welcome_text": "Hello",
            "subtitle": null,
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z",
            "publishedAt": "2025-01-01T00:00:00Z"
        });

        let home: HomeContent = serde_json::from_value(json).unwrap();
        assert_eq!(home.welcome_text, "Hello");
        assert!(home.subtitle.is_none());
        assert!(home.content.is_none());

        let back = serde_json::to_value(&home).unwrap();
        assert!(back.get("documentId").is_some());
        assert!(back.get("welcome_text").is_some());
    }

    #[test]
    fn test_document_id_is_opaque() {
        let json = serde_json::json!({
            "id": 3,
            "documentId": "k8x2q0v7mz1l4c9p5t3n6w0a",
            "welcome_text": "Hello",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z",
            "publishedAt": null
        });

        let home: HomeContent = serde_json::from_value(json).unwrap();
        assert_eq!(home.document_id, "k8x2q0v7mz1l4c9p5t3n6w0a");
    }

    #[test]
    fn test_input_omits_absent_fields() {
        let input = HomeInput {
            welcome_text: "Hi".to_owned(),
            subtitle: None,
            content: None,
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            serde_json::json!({ "welcome_text": "Hi" })
        );
    }
}
