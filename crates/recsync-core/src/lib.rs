//! recsync-core - Core types, traits and the record synchronization client.
//!
//! All remote interaction flows through a [`RecordSyncClient`] wrapping a
//! [`RecordStore`] implementation.
//!
//! # Example
//!
//! ```no_run
//! use recsync_core::{CallOptions, ListFilter, RecordStore, RecordSyncClient, ScopeKey};
//!
//! # async fn example<S: RecordStore>(store: S) -> recsync_core::Result<()> {
//! let client = RecordSyncClient::new(store);
//! let scope = ScopeKey::new("alice@example.com");
//! let opts = CallOptions::new();
//!
//! let mut draft = client.new_pending_edit(&scope, &opts).await?;
//! draft.title = "Quarterly report".to_string();
//! let saved = client.submit(&draft, &opts).await?;
//!
//! let page = client.list(1, &ListFilter::own(scope), &opts).await?;
//! assert!(page.records.iter().any(|r| r.id == saved.id));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod pagination;
pub mod record;
pub mod time;
pub mod traits;
pub mod types;

pub use client::{CallOptions, RecordSyncClient, can_edit};
pub use error::{DomainError, Error, ErrorKind, TransportError, ValidationError};
pub use record::{
    FieldSpec, ListFilter, MetaMap, MetaSchema, MetaValue, PendingEdit, Record, RecordListPage,
    SearchQuery,
};
pub use time::TimeRangePolicy;
pub use traits::RecordStore;
pub use types::{ApiUrl, RecordId, ScopeKey};

pub use tokio_util::sync::CancellationToken;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
