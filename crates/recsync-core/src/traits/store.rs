//! Record store trait.

use async_trait::async_trait;

use crate::Result;
use crate::record::{ListFilter, MetaSchema, PendingEdit, Record, RecordListPage, SearchQuery};
use crate::types::RecordId;

/// A remote (or in-process) store of records.
///
/// Implementations perform exactly one round trip per call and never retry.
/// Validation, scope guards and timeouts live in
/// [`RecordSyncClient`](crate::RecordSyncClient), not here.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Reserve a fresh record id.
    async fn allocate_id(&self) -> Result<RecordId>;

    /// Fetch one page of records visible under `filter`.
    async fn list(&self, page: u32, filter: &ListFilter) -> Result<RecordListPage>;

    /// Fetch every record matching `query` under `filter`.
    async fn search(&self, query: &SearchQuery, filter: &ListFilter) -> Result<Vec<Record>>;

    /// Fetch a single record.
    async fn get(&self, id: &RecordId) -> Result<Record>;

    /// Persist a new record. The returned record's id is authoritative.
    async fn create(&self, edit: &PendingEdit) -> Result<Record>;

    /// Replace the record at `edit.id()`.
    async fn update(&self, edit: &PendingEdit) -> Result<Record>;

    /// Delete a record.
    async fn delete(&self, id: &RecordId) -> Result<()>;

    /// Fetch the deployment's meta-field schema.
    async fn meta_schema(&self) -> Result<MetaSchema>;
}

#[async_trait]
impl<S> RecordStore for std::sync::Arc<S>
where
    S: RecordStore + ?Sized,
{
    async fn allocate_id(&self) -> Result<RecordId> {
        (**self).allocate_id().await
    }

    async fn list(&self, page: u32, filter: &ListFilter) -> Result<RecordListPage> {
        (**self).list(page, filter).await
    }

    async fn search(&self, query: &SearchQuery, filter: &ListFilter) -> Result<Vec<Record>> {
        (**self).search(query, filter).await
    }

    async fn get(&self, id: &RecordId) -> Result<Record> {
        (**self).get(id).await
    }

    async fn create(&self, edit: &PendingEdit) -> Result<Record> {
        (**self).create(edit).await
    }

    async fn update(&self, edit: &PendingEdit) -> Result<Record> {
        (**self).update(edit).await
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        (**self).delete(id).await
    }

    async fn meta_schema(&self) -> Result<MetaSchema> {
        (**self).meta_schema().await
    }
}
