//! Endpoint paths and request/response bodies of the record API.

use serde::{Deserialize, Serialize};

use recsync_core::record::{ListFilter, Record};
use recsync_core::types::RecordId;

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Record collection: list (GET) and create (POST).
pub const RECORDS: &str = "records";

/// Sub-path of [`RECORDS`] for full-text search.
pub const SEARCH: &str = "search";

/// Id allocation.
pub const NEW_ID: &str = "new-id";

/// Meta-field schema.
pub const META_FIELDS: &str = "meta-fields";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for list and search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<&'a str>,
    pub scope: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_all: bool,
}

impl<'a> QueryParams<'a> {
    /// Parameters for one page of a list.
    pub fn list(page: u32, filter: &'a ListFilter) -> Self {
        Self {
            page: Some(page),
            q: None,
            scope: filter.scope.as_str(),
            include_all: filter.include_all_scopes,
        }
    }

    /// Parameters for a search.
    pub fn search(q: &'a str, filter: &'a ListFilter) -> Self {
        Self {
            page: None,
            q: Some(q),
            scope: filter.scope.as_str(),
            include_all: filter.include_all_scopes,
        }
    }
}

/// Response from the list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub records: Vec<Record>,
    /// Total page count. Some servers omit it.
    #[serde(default)]
    pub pages: Option<u32>,
}

/// Response from the id allocation endpoint.
#[derive(Debug, Deserialize)]
pub struct NewIdResponse {
    pub id: RecordId,
}

/// Error body returned by the API.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// The most specific message in the body, if any.
    pub fn into_message(self) -> Option<String> {
        self.error
            .filter(|e| !e.trim().is_empty())
            .or(self.message.filter(|m| !m.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_all_only_sent_when_set() {
        let own = ListFilter::own("u1");
        assert_eq!(
            serde_json::to_value(QueryParams::list(2, &own)).unwrap(),
            serde_json::json!({"page": 2, "scope": "u1"})
        );

        let all = ListFilter::all("u1");
        assert_eq!(
            serde_json::to_value(QueryParams::search("*", &all)).unwrap(),
            serde_json::json!({"q": "*", "scope": "u1", "includeAll": true})
        );
    }

    #[test]
    fn error_message_prefers_error_field() {
        let body: ErrorResponse =
            serde_json::from_str(r#"{"error": "Unauthorized", "message": "nope"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Unauthorized"));

        let body: ErrorResponse =
            serde_json::from_str(r#"{"message": "Title is required"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Title is required"));

        assert_eq!(ErrorResponse::default().into_message(), None);
    }
}
