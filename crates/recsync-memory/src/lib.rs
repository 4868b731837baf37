//! recsync-memory - In-process record store.
//!
//! [`MemoryRecordStore`] keeps records in memory and enforces the same
//! contract as a remote store: scope filtering, paging, search, ownership
//! checks and id allocation.

mod id_pattern;
mod store;

pub use id_pattern::IdPattern;
pub use store::{MemoryRecordStore, MemoryRecordStoreBuilder};
