//! In-memory storage for records.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use recsync_core::Result;
use recsync_core::error::{DomainError, Error};
use recsync_core::pagination;
use recsync_core::record::{
    ListFilter, MetaSchema, PendingEdit, Record, RecordListPage, SearchQuery,
};
use recsync_core::traits::RecordStore;
use recsync_core::types::RecordId;

use crate::id_pattern::IdPattern;

/// Allocation attempts before giving up on a crowded pattern.
const MAX_ALLOCATION_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone)]
struct Stored {
    seq: u64,
    record: Record,
}

#[derive(Debug, Default)]
struct Inner {
    records: BTreeMap<String, Stored>,
    next_seq: u64,
}

impl Inner {
    /// Records visible under `filter`, newest first.
    fn visible(&self, filter: &ListFilter) -> Vec<&Stored> {
        let mut visible: Vec<_> = self
            .records
            .values()
            .filter(|s| filter.include_all_scopes || s.record.creator_id == filter.scope)
            .collect();
        visible.sort_by(|a, b| b.seq.cmp(&a.seq));
        visible
    }
}

/// An in-process [`RecordStore`].
///
/// Behaves like a remote store for the sync client: it stamps
/// `created_at`/`changed_at`, reports unknown ids as
/// [`Error::NotFound`], and rejects writes a server would reject with a
/// [`DomainError`].
#[derive(Debug)]
pub struct MemoryRecordStore {
    inner: RwLock<Inner>,
    page_size: usize,
    id_pattern: IdPattern,
    meta_schema: MetaSchema,
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl MemoryRecordStore {
    /// Default number of records per page.
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    /// Create an empty store with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start configuring a store.
    pub fn builder() -> MemoryRecordStoreBuilder {
        MemoryRecordStoreBuilder::default()
    }

    /// Number of stored records across all scopes.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// True if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn reject(status: u16, message: impl Into<String>) -> Error {
        Error::Domain(DomainError::new(status, message))
    }

    /// Check a draft the way a server checks a request body.
    fn check(edit: &PendingEdit) -> Result<()> {
        edit.validate()
            .map_err(|e| Self::reject(400, e.to_string()))
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    #[instrument(skip(self))]
    async fn allocate_id(&self) -> Result<RecordId> {
        let inner = self.inner.read().await;
        let attempts = if (inner.records.len() as u64) < self.id_pattern.capacity() {
            MAX_ALLOCATION_ATTEMPTS
        } else {
            0
        };
        for _ in 0..attempts {
            let candidate = self.id_pattern.generate();
            if !inner.records.contains_key(&candidate) {
                debug!(id = %candidate, "Allocated id");
                return RecordId::new(candidate);
            }
        }
        Err(Self::reject(
            503,
            format!("no free id left for pattern {}", self.id_pattern),
        ))
    }

    #[instrument(skip(self))]
    async fn list(&self, page: u32, filter: &ListFilter) -> Result<RecordListPage> {
        let inner = self.inner.read().await;
        let visible = inner.visible(filter);
        let total_pages = pagination::total_pages(visible.len(), self.page_size);
        let start = (page.max(1) as usize - 1).saturating_mul(self.page_size);

        let records: Vec<Record> = visible
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .map(|s| s.record.clone())
            .collect();

        debug!(count = records.len(), total_pages, "Listed records");
        Ok(RecordListPage {
            records,
            page,
            total_pages,
        })
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &SearchQuery, filter: &ListFilter) -> Result<Vec<Record>> {
        let inner = self.inner.read().await;
        Ok(inner
            .visible(filter)
            .into_iter()
            .filter(|s| query.matches(&s.record))
            .map(|s| s.record.clone())
            .collect())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &RecordId) -> Result<Record> {
        self.inner
            .read()
            .await
            .records
            .get(id.as_str())
            .map(|s| s.record.clone())
            .ok_or_else(|| Error::not_found(id))
    }

    #[instrument(skip(self, edit), fields(id = %edit.id()))]
    async fn create(&self, edit: &PendingEdit) -> Result<Record> {
        Self::check(edit)?;

        let mut inner = self.inner.write().await;
        if inner.records.contains_key(edit.id().as_str()) {
            return Err(Self::reject(
                409,
                format!("Record {} already exists", edit.id()),
            ));
        }

        let record = Record {
            id: edit.id().clone(),
            title: edit.title.clone(),
            description: edit.description.clone(),
            time_start: edit.time_start,
            time_end: edit.time_end,
            active: edit.active,
            creator_id: edit.creator_id.clone(),
            meta: edit.meta.clone(),
            created_at: Some(Utc::now()),
            changed_at: None,
        };

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.records.insert(
            record.id.to_string(),
            Stored {
                seq,
                record: record.clone(),
            },
        );

        debug!(creator = %record.creator_id, "Created record");
        Ok(record)
    }

    #[instrument(skip(self, edit), fields(id = %edit.id()))]
    async fn update(&self, edit: &PendingEdit) -> Result<Record> {
        Self::check(edit)?;

        let mut inner = self.inner.write().await;
        let stored = inner
            .records
            .get_mut(edit.id().as_str())
            .ok_or_else(|| Error::not_found(edit.id()))?;

        if stored.record.creator_id != edit.creator_id {
            debug!(owner = %stored.record.creator_id, "Update by non-owner refused");
            return Err(Self::reject(403, "Unauthorized"));
        }

        let record = &mut stored.record;
        record.title = edit.title.clone();
        record.description = edit.description.clone();
        record.time_start = edit.time_start;
        record.time_end = edit.time_end;
        record.active = edit.active;
        record.meta = edit.meta.clone();
        record.changed_at = Some(Utc::now());

        debug!("Updated record");
        Ok(record.clone())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &RecordId) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.records.remove(id.as_str()) {
            Some(_) => {
                debug!("Deleted record");
                Ok(())
            }
            None => Err(Error::not_found(id)),
        }
    }

    async fn meta_schema(&self) -> Result<MetaSchema> {
        Ok(self.meta_schema.clone())
    }
}

/// Builder for [`MemoryRecordStore`].
#[derive(Debug, Clone)]
pub struct MemoryRecordStoreBuilder {
    page_size: usize,
    id_pattern: IdPattern,
    meta_schema: MetaSchema,
}

impl Default for MemoryRecordStoreBuilder {
    fn default() -> Self {
        Self {
            page_size: MemoryRecordStore::DEFAULT_PAGE_SIZE,
            id_pattern: IdPattern::default(),
            meta_schema: MetaSchema::default(),
        }
    }
}

impl MemoryRecordStoreBuilder {
    /// Records per page. Zero is treated as one.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Pattern for allocated ids.
    pub fn id_pattern(mut self, pattern: IdPattern) -> Self {
        self.id_pattern = pattern;
        self
    }

    /// Meta-field schema reported by the store.
    pub fn meta_schema(mut self, schema: MetaSchema) -> Self {
        self.meta_schema = schema;
        self
    }

    /// Build the store.
    pub fn build(self) -> MemoryRecordStore {
        MemoryRecordStore {
            inner: RwLock::new(Inner::default()),
            page_size: self.page_size,
            id_pattern: self.id_pattern,
            meta_schema: self.meta_schema,
        }
    }
}
