//! Core traits for store behavior.

mod store;

pub use store::RecordStore;
