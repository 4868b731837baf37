//! Record data model.
//!
//! This module defines the records exchanged with a store, the caller-owned
//! [`PendingEdit`] draft, and the meta-field schema.

mod instant;
mod meta;
mod pending;
mod types;

pub use meta::{FieldSpec, MetaMap, MetaSchema, MetaValue};
pub use pending::PendingEdit;
pub use types::{ListFilter, Record, RecordListPage, SearchQuery};
