//! Query string formatting in the CMS bracket notation.
//!
//! Nested objects become `a[b][c]=v` and arrays become `a[0]=v`. Values are
//! percent-encoded (RFC 3986 unreserved characters kept), keys are not.
//! `null` values are skipped.
//!
//! ```
//! use cms_starter_client::format_query;
//! use serde_json::json;
//!
//! let query = format_query(&json!({
//!     "filters": { "slug": { "$eq": "about us" } },
//!     "populate": ["cover"],
//! }));
//! assert_eq!(query, "filters[slug][$eq]=about%20us&populate[0]=cover");
//! ```

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Format a JSON object as a query string (without the leading `?`).
///
/// Non-object values produce an empty string.
#[must_use]
pub fn format_query(params: &Value) -> String {
    let mut pairs = Vec::new();
    if let Value::Object(map) = params {
        for (key, value) in map {
            push_pairs(key.clone(), value, &mut pairs);
        }
    }
    pairs.join("&")
}

fn push_pairs(key: String, value: &Value, pairs: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push(format!("{key}={b}")),
        Value::Number(n) => pairs.push(format!("{key}={n}")),
        Value::String(s) => pairs.push(format!("{key}={}", urlencoding::encode(s))),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                push_pairs(format!("{key}[{index}]"), item, pairs);
            }
        }
        Value::Object(map) => {
            for (child, item) in map {
                push_pairs(format!("{key}[{child}]"), item, pairs);
            }
        }
    }
}

/// Relation population.
#[derive(Debug, Clone, PartialEq)]
pub enum Populate {
    /// Every first-level relation (`populate=*`).
    All,
    /// Named relations (`populate[0]=a&populate[1]=b`).
    Fields(Vec<String>),
    /// Arbitrary nested population object.
    Nested(Value),
}

impl Serialize for Populate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str("*"),
            Self::Fields(fields) => fields.serialize(serializer),
            Self::Nested(value) => value.serialize(serializer),
        }
    }
}

/// Page-based pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: u32,
    pub page_size: u32,
}

/// Common query parameters of the CMS REST API.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageParams>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub populate: Option<Populate>,
    /// Any other top-level keys (`locale`, `status`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueryParams {
    /// `populate=*`.
    #[must_use]
    pub fn populate_all() -> Self {
        Self {
            populate: Some(Populate::All),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: Value) -> Self {
        self.filters = Some(filters);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort.push(sort.into());
        self
    }

    #[must_use]
    pub const fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.pagination = Some(PageParams { page, page_size });
        self
    }

    /// Query string without the leading `?`; empty when nothing is set.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        // Serializing plain strings, numbers and JSON values cannot fail.
        serde_json::to_value(self)
            .map(|value| format_query(&value))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_filters_and_populate_array() {
        let query = format_query(&json!({ "filters": { "a": 1 }, "populate": ["b"] }));
        assert!(query.contains("filters[a]=1"));
        assert!(query.contains("populate[0]=b"));
    }

    #[test]
    fn test_values_are_encoded_keys_are_not() {
        let query = format_query(&json!({ "filters": { "title": { "$contains": "a&b=c é" } } }));
        assert_eq!(query, "filters[title][$contains]=a%26b%3Dc%20%C3%A9");
    }

    #[test]
    fn test_unreserved_characters_kept() {
        assert_eq!(format_query(&json!({ "q": "a-b_c.d~e" })), "q=a-b_c.d~e");
    }

    #[test]
    fn test_nulls_skipped() {
        assert_eq!(format_query(&json!({ "a": null, "b": [null, 2] })), "b[1]=2");
    }

    #[test]
    fn test_non_object_is_empty() {
        assert_eq!(format_query(&json!(["a"])), "");
        assert_eq!(format_query(&json!("a")), "");
        assert_eq!(format_query(&json!({})), "");
    }

    #[test]
    fn test_nested_arrays_of_objects() {
        let query = format_query(&json!({ "sort": ["title:asc"], "filters": { "$or": [{ "a": true }, { "b": false }] } }));
        assert!(query.contains("sort[0]=title%3Aasc"));
        assert!(query.contains("filters[$or][0][a]=true"));
        assert!(query.contains("filters[$or][1][b]=false"));
    }

    #[test]
    fn test_populate_all() {
        assert_eq!(QueryParams::populate_all().to_query_string(), "populate=%2A");
    }

    #[test]
    fn test_query_params_builder() {
        let query = QueryParams::default()
            .with_page(2, 25)
            .with_sort("publishedAt:desc")
            .with_filters(json!({ "featured": true }))
            .to_query_string();
        assert!(query.contains("pagination[page]=2"));
        assert!(query.contains("pagination[pageSize]=25"));
        assert!(query.contains("sort[0]=publishedAt%3Adesc"));
        assert!(query.contains("filters[featured]=true"));
    }

    #[test]
    fn test_empty_params() {
        assert_eq!(QueryParams::default().to_query_string(), "");
    }

    #[test]
    fn test_extra_keys_flattened() {
        let mut params = QueryParams::default();
        params.extra.insert("locale".to_owned(), json!("fr"));
        assert_eq!(params.to_query_string(), "locale=fr");
    }
}
