//! Core identifier types.
//!
//! These types enforce their invariants at construction time,
//! so an invalid id or base URL cannot reach a request.

mod api_url;
mod record_id;
mod scope_key;

pub use api_url::ApiUrl;
pub use record_id::RecordId;
pub use scope_key::ScopeKey;
