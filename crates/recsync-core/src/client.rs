//! The record synchronization client.
//!
//! [`RecordSyncClient`] sits between a caller-owned view model (the current
//! [`PendingEdit`], the active [`ListFilter`]) and a [`RecordStore`]. It
//! validates drafts before anything is sent, routes new drafts to create and
//! existing ones to update, guards list and search against a missing scope,
//! and bounds every remote call by the caller's timeout and cancellation
//! token.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::error::{Error, TransportError, ValidationError};
use crate::record::{ListFilter, MetaSchema, PendingEdit, Record, RecordListPage, SearchQuery};
use crate::traits::RecordStore;
use crate::types::{RecordId, ScopeKey};
use crate::Result;

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl CallOptions {
    /// Options with no timeout and no cancellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`Error::Timeout`] if the call takes longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolve to [`Error::Canceled`] once `token` is canceled.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Mediates every interaction with a [`RecordStore`].
///
/// The client holds no mutable state, so one instance may serve any number
/// of independent callers. No call is ever retried.
#[derive(Debug, Clone)]
pub struct RecordSyncClient<S> {
    store: S,
    default_timeout: Option<Duration>,
}

impl<S: RecordStore> RecordSyncClient<S> {
    /// Create a client over a store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            default_timeout: None,
        }
    }

    /// Timeout applied when a call's options carry none.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reserve a fresh id for a record that does not exist yet.
    #[instrument(skip(self, opts))]
    pub async fn allocate_id(&self, opts: &CallOptions) -> Result<RecordId> {
        debug!("Allocating record id");
        self.call(opts, self.store.allocate_id()).await
    }

    /// Allocate an id and seed a new, empty draft owned by `scope`.
    #[instrument(skip(self, opts), fields(%scope))]
    pub async fn new_pending_edit(
        &self,
        scope: &ScopeKey,
        opts: &CallOptions,
    ) -> Result<PendingEdit> {
        let id = self.allocate_id(opts).await?;
        Ok(PendingEdit::allocated(id, scope.clone()))
    }

    /// Fetch one page of records.
    ///
    /// An empty scope yields an empty page without contacting the store.
    /// A page past the last one yields no records.
    #[instrument(skip(self, opts), fields(scope = %filter.scope, all = filter.include_all_scopes))]
    pub async fn list(
        &self,
        page: u32,
        filter: &ListFilter,
        opts: &CallOptions,
    ) -> Result<RecordListPage> {
        if page == 0 {
            return Err(ValidationError::InvalidPage { page }.into());
        }
        if filter.scope.is_empty() {
            debug!("No scope key set, skipping list");
            return Ok(RecordListPage::empty(page));
        }

        let mut result = self.call(opts, self.store.list(page, filter)).await?;
        result.page = page;
        if page > result.total_pages {
            result.records.clear();
        }
        debug!(
            count = result.records.len(),
            total_pages = result.total_pages,
            "Listed records"
        );
        Ok(result)
    }

    /// Fetch every record matching `query`.
    ///
    /// Blank input and `*` both match everything. An empty scope yields no
    /// records without contacting the store.
    #[instrument(skip(self, opts), fields(scope = %filter.scope, all = filter.include_all_scopes))]
    pub async fn search(
        &self,
        query: &str,
        filter: &ListFilter,
        opts: &CallOptions,
    ) -> Result<Vec<Record>> {
        let query = SearchQuery::parse(query);
        if filter.scope.is_empty() {
            debug!("No scope key set, skipping search");
            return Ok(Vec::new());
        }

        let records = self.call(opts, self.store.search(&query, filter)).await?;
        debug!(count = records.len(), "Search finished");
        Ok(records)
    }

    /// Fetch a single record.
    #[instrument(skip(self, opts), fields(%id))]
    pub async fn fetch_one(&self, id: &RecordId, opts: &CallOptions) -> Result<Record> {
        self.call(opts, self.store.get(id)).await
    }

    /// Persist a draft.
    ///
    /// New drafts are created, existing ones updated at their own id. The
    /// draft is validated first; an invalid draft is never sent. Returns once
    /// the store has acknowledged the write.
    #[instrument(skip(self, edit, opts), fields(id = %edit.id(), is_new = edit.is_new()))]
    pub async fn submit(&self, edit: &PendingEdit, opts: &CallOptions) -> Result<Record> {
        edit.validate()?;

        if edit.is_new() {
            debug!("Creating record");
            let record = self.call(opts, self.store.create(edit)).await?;
            debug!(id = %record.id, "Record created");
            Ok(record)
        } else {
            debug!("Updating record");
            let record = self.call(opts, self.store.update(edit)).await?;
            if record.id != *edit.id() {
                return Err(TransportError::Decode {
                    message: format!("update of {} returned record {}", edit.id(), record.id),
                }
                .into());
            }
            Ok(record)
        }
    }

    /// Delete a record. An unknown id is reported as [`Error::NotFound`].
    #[instrument(skip(self, opts), fields(%id))]
    pub async fn delete_one(&self, id: &RecordId, opts: &CallOptions) -> Result<()> {
        self.call(opts, self.store.delete(id)).await
    }

    /// Fetch the deployment's meta-field schema.
    #[instrument(skip(self, opts))]
    pub async fn meta_schema(&self, opts: &CallOptions) -> Result<MetaSchema> {
        self.call(opts, self.store.meta_schema()).await
    }

    /// Run one store call under the caller's timeout and cancellation.
    async fn call<T, F>(&self, opts: &CallOptions, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if opts.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            return Err(Error::Canceled);
        }

        let limit = opts.timeout.or(self.default_timeout);
        let bounded = async move {
            match limit {
                Some(limit) => match tokio::time::timeout(limit, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::Timeout {
                        duration_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    }),
                },
                None => fut.await,
            }
        };

        let result = match &opts.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(Error::Canceled),
                    result = bounded => result,
                }
            }
            None => bounded.await,
        };

        if let Err(e) = &result {
            debug!(error = %e, kind = ?e.kind(), "Store call failed");
        }
        result
    }
}

/// True if `scope` owns `record` and may edit it.
pub fn can_edit(record: &Record, scope: &ScopeKey) -> bool {
    record.creator_id == *scope
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(creator: &str) -> Record {
        serde_json::from_value(json!({
            "id": "R1",
            "title": "t",
            "creator_id": creator
        }))
        .unwrap()
    }

    #[test]
    fn can_edit_own_record_only() {
        assert!(!can_edit(&record("u1"), &ScopeKey::new("u2")));
        assert!(can_edit(&record("u1"), &ScopeKey::new("u1")));
    }

    #[test]
    fn call_options_builder() {
        let token = CancellationToken::new();
        let opts = CallOptions::new()
            .timeout(Duration::from_secs(2))
            .cancel_on(token.clone());
        assert_eq!(opts.timeout, Some(Duration::from_secs(2)));
        token.cancel();
        assert!(opts.cancel.unwrap().is_cancelled());
    }
}
