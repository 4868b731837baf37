//! Record and list types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pagination::{self, PageSlot};
use crate::types::{RecordId, ScopeKey};

use super::MetaMap;
use super::instant;

fn default_active() -> bool {
    true
}

/// A record as stored by the remote store.
///
/// Records are immutable snapshots: list and search results are replaced
/// wholesale on refresh, and edits go through a
/// [`PendingEdit`](super::PendingEdit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The record id.
    pub id: RecordId,

    /// Title (required).
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        default,
        alias = "timeStart",
        with = "instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_start: Option<DateTime<Utc>>,

    #[serde(
        default,
        alias = "timeEnd",
        with = "instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_end: Option<DateTime<Utc>>,

    #[serde(default = "default_active")]
    pub active: bool,

    /// Owner of the record.
    #[serde(default, alias = "creatorId")]
    pub creator_id: ScopeKey,

    /// Deployment-defined meta values.
    #[serde(default)]
    pub meta: MetaMap,

    /// Set by the server on creation.
    #[serde(
        default,
        alias = "createdAt",
        with = "instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    /// Set by the server on every change.
    #[serde(
        default,
        alias = "changedAt",
        with = "instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub changed_at: Option<DateTime<Utc>>,
}

impl Record {
    /// Meta values that carry something worth showing.
    pub fn filled_meta(&self) -> impl Iterator<Item = (&str, &super::MetaValue)> {
        self.meta
            .iter()
            .filter(|(_, value)| !value.is_blank())
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Most recent server timestamp.
    pub fn last_touched(&self) -> Option<DateTime<Utc>> {
        self.changed_at.or(self.created_at)
    }
}

/// One page of a record list.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordListPage {
    /// Records on this page, in store order.
    pub records: Vec<Record>,
    /// The 1-based page number.
    pub page: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

impl RecordListPage {
    /// A page with no records.
    pub fn empty(page: u32) -> Self {
        Self {
            records: Vec::new(),
            page,
            total_pages: 0,
        }
    }

    /// True if the page holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// True if an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }

    /// Pager entries around this page.
    pub fn window(&self, delta: u32) -> Vec<PageSlot> {
        pagination::page_window(self.page, self.total_pages, delta)
    }
}

/// Which records a list or search covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// The caller's scope key.
    pub scope: ScopeKey,
    /// Include records of every owner, not only the caller's.
    pub include_all_scopes: bool,
}

impl ListFilter {
    /// Filter for the caller's own records.
    pub fn own(scope: impl Into<ScopeKey>) -> Self {
        Self {
            scope: scope.into(),
            include_all_scopes: false,
        }
    }

    /// Filter including every owner's records.
    pub fn all(scope: impl Into<ScopeKey>) -> Self {
        Self {
            scope: scope.into(),
            include_all_scopes: true,
        }
    }
}

/// A normalized search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Match every record.
    All,
    /// Match records containing the text.
    Text(String),
}

impl SearchQuery {
    /// The wildcard that means "match all".
    pub const WILDCARD: &'static str = "*";

    /// Normalize raw input. Blank input and `*` both mean "match all".
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == Self::WILDCARD {
            SearchQuery::All
        } else {
            SearchQuery::Text(trimmed.to_string())
        }
    }

    /// The query string to send to a store.
    pub fn as_param(&self) -> &str {
        match self {
            SearchQuery::All => Self::WILDCARD,
            SearchQuery::Text(text) => text,
        }
    }

    /// Case-insensitive match against a record's title and description.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            SearchQuery::All => true,
            SearchQuery::Text(text) => {
                let needle = text.to_lowercase();
                record.title.to_lowercase().contains(&needle)
                    || record
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_snake_case_with_defaults() {
        let record: Record = serde_json::from_value(json!({
            "id": "R100",
            "title": "Test",
            "creator_id": "u1"
        }))
        .unwrap();

        assert_eq!(record.id.as_str(), "R100");
        assert!(record.active);
        assert!(record.meta.is_empty());
        assert!(record.time_start.is_none());
    }

    #[test]
    fn accepts_camel_case_and_unix_seconds() {
        let record: Record = serde_json::from_value(json!({
            "id": 7,
            "title": "Test",
            "creatorId": "u1",
            "active": false,
            "timeStart": 1700000000,
            "timeEnd": "2023-11-14T23:00:00Z",
            "createdAt": "1700000000"
        }))
        .unwrap();

        assert_eq!(record.creator_id.as_str(), "u1");
        assert!(!record.active);
        assert_eq!(record.time_start.unwrap().timestamp(), 1_700_000_000);
        assert!(record.time_end.is_some());
        assert_eq!(record.created_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn null_times_are_absent() {
        let record: Record = serde_json::from_value(json!({
            "id": "R1",
            "title": "t",
            "time_start": null,
            "time_end": ""
        }))
        .unwrap();
        assert!(record.time_start.is_none());
        assert!(record.time_end.is_none());
    }

    #[test]
    fn search_query_normalization() {
        assert_eq!(SearchQuery::parse(""), SearchQuery::All);
        assert_eq!(SearchQuery::parse("  * "), SearchQuery::All);
        assert_eq!(
            SearchQuery::parse(" lunch "),
            SearchQuery::Text("lunch".into())
        );
        assert_eq!(SearchQuery::All.as_param(), "*");
    }

    #[test]
    fn search_matches_title_and_description() {
        let record: Record = serde_json::from_value(json!({
            "id": "R1",
            "title": "Quarterly Report",
            "description": "Finance review"
        }))
        .unwrap();

        assert!(SearchQuery::parse("report").matches(&record));
        assert!(SearchQuery::parse("FINANCE").matches(&record));
        assert!(!SearchQuery::parse("holiday").matches(&record));
    }

    #[test]
    fn page_navigation() {
        let page = RecordListPage {
            records: vec![],
            page: 2,
            total_pages: 3,
        };
        assert!(page.has_next());
        assert!(page.has_previous());
        assert!(!RecordListPage::empty(1).has_next());
    }
}
