//! Working copy of a record being created or edited.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::error::ValidationError;
use crate::time::{self, TimeRangePolicy};
use crate::types::{RecordId, ScopeKey};

use super::instant;
use super::{MetaMap, MetaSchema, Record};

/// The caller-owned draft of a record.
///
/// A draft is either *new* (its id came from the store's id allocation and
/// has not been persisted yet, so submitting creates it) or *existing*
/// (populated from a fetched record, so submitting updates it in place).
/// The id and the new/existing flag are fixed at construction.
///
/// Serializes to the request body sent on create and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingEdit {
    id: RecordId,

    #[serde(skip)]
    is_new: bool,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(with = "instant")]
    pub time_start: Option<DateTime<Utc>>,

    #[serde(with = "instant")]
    pub time_end: Option<DateTime<Utc>>,

    pub active: bool,

    pub creator_id: ScopeKey,

    pub meta: MetaMap,
}

impl PendingEdit {
    /// Seed an empty draft from a freshly allocated id.
    pub fn allocated(id: RecordId, creator: ScopeKey) -> Self {
        Self {
            id,
            is_new: true,
            title: String::new(),
            description: None,
            time_start: None,
            time_end: None,
            active: true,
            creator_id: creator,
            meta: MetaMap::new(),
        }
    }

    /// Populate a draft from an existing record.
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            is_new: false,
            title: record.title.clone(),
            description: record.description.clone(),
            time_start: record.time_start,
            time_end: record.time_end,
            active: record.active,
            creator_id: record.creator_id.clone(),
            meta: record.meta.clone(),
        }
    }

    /// The draft's id.
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// True if submitting this draft creates a record.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the description; blank text clears it.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.set_description(description);
        self
    }

    /// Set the description in place; blank text clears it.
    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        self.description = (!description.trim().is_empty()).then_some(description);
    }

    /// Set start and end from local date/time inputs.
    ///
    /// The draft is left untouched when the inputs are rejected.
    pub fn set_time_range(
        &mut self,
        start: Option<&str>,
        end: Option<&str>,
        offset: FixedOffset,
        policy: TimeRangePolicy,
    ) -> Result<(), ValidationError> {
        let (start, end) = time::resolve_range(start, end, offset, policy)?;
        self.time_start = start;
        self.time_end = end;
        Ok(())
    }

    /// Replace the meta values with the blank state of a schema.
    pub fn reset_meta(&mut self, schema: &MetaSchema) {
        self.meta = schema.blank_values();
    }

    /// Check the fields a store requires.
    ///
    /// The title must be non-blank, the creator must be set, and the end of
    /// the time range may not precede its start.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "title" });
        }
        if self.creator_id.is_empty() {
            return Err(ValidationError::MissingField {
                field: "creator_id",
            });
        }
        time::check_order(self.time_start, self.time_end)
    }
}
