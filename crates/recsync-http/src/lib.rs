//! recsync-http - REST/JSON record store.
//!
//! [`HttpRecordStore`] implements [`RecordStore`](recsync_core::RecordStore)
//! against a record API reachable over HTTP(S).

mod client;
mod endpoints;
mod store;

pub use store::{HttpRecordStore, HttpStoreConfig};
