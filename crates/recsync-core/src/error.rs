//! Error types for recsync.
//!
//! Every remote or local failure is reported as one [`Error`] whose variant
//! tells the caller what happened: a local validation failure, a missing
//! record, a server-side business rule, a transport failure, a timeout or a
//! cancellation.

use std::fmt;
use thiserror::Error;

/// The unified error type for recsync operations.
///
/// Variants are explicit so presentation code can pick wording and decide
/// which input (if any) to refocus.
#[derive(Debug, Error)]
pub enum Error {
    /// Local, pre-network validation failed. No request was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The store has no record with this id.
    #[error("record not found: {id}")]
    NotFound { id: String },

    /// The server rejected the request on a business rule.
    #[error("rejected by server: {0}")]
    Domain(#[from] DomainError),

    /// Transport failure (connection, server error, undecodable body).
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// The call did not complete within its deadline.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The caller canceled the call before it resolved.
    #[error("request canceled")]
    Canceled,
}

/// Flat classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Domain,
    Network,
    Timeout,
    Canceled,
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Domain(_) => ErrorKind::Domain,
            Error::Network(_) => ErrorKind::Network,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Canceled => ErrorKind::Canceled,
        }
    }

    /// True for failures where trying again later may succeed.
    ///
    /// Nothing in recsync retries on its own; this only informs the caller.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Timeout { .. })
    }

    /// Build a `NotFound` error for an id.
    pub fn not_found(id: impl fmt::Display) -> Self {
        Error::NotFound { id: id.to_string() }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// The server failed to handle the request (HTTP 5xx).
    #[error("server error (HTTP {status}){}", fmt_detail(.message))]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// A successful response body could not be decoded.
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

fn fmt_detail(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {}", m),
        None => String::new(),
    }
}

/// A business-rule rejection from the server.
///
/// The message is passed through verbatim from the `{error: string}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    /// HTTP status code.
    pub status: u16,
    /// Message from the server, or a generic one when the body was empty.
    pub message: String,
}

impl DomainError {
    /// Create a new domain error.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Create a domain error for a response without a usable error body.
    pub fn generic(status: u16) -> Self {
        Self::new(status, format!("request failed with status {}", status))
    }

    /// Check if the server refused the caller's ownership of the record.
    pub fn is_forbidden(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

impl std::error::Error for DomainError {}

/// Input validation errors, raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// The end of a time range lies before its start.
    #[error("time_end ({end}) is before time_start ({start})")]
    TimeRange { start: String, end: String },

    /// Pages are numbered from 1.
    #[error("invalid page {page}: pages start at 1")]
    InvalidPage { page: u32 },

    /// A local date/time string could not be parsed.
    #[error("invalid date/time '{value}': {reason}")]
    InvalidDateTime { value: String, reason: String },

    /// A timezone offset could not be parsed.
    #[error("invalid timezone '{value}'")]
    InvalidTimezone { value: String },

    /// Invalid record id.
    #[error("invalid record id '{value}': {reason}")]
    InvalidId { value: String, reason: String },

    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    InvalidApiUrl { value: String, reason: String },
}

impl ValidationError {
    /// Name of the input this error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingField { field } => Some(field),
            ValidationError::TimeRange { .. } => Some("time_end"),
            ValidationError::InvalidPage { .. } => Some("page"),
            ValidationError::InvalidId { .. } => Some("id"),
            _ => None,
        }
    }
}
