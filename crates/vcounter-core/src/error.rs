//! Shared error type across vcounter crates.

use thiserror::Error;

/// Stable codes attached to failures in logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Store could not be reached or timed out.
    StoreUnavailable,
    /// Store answered with an unexpected status.
    StoreRejected,
    /// Create hit an existing record.
    Conflict,
    /// Stored record could not be decoded.
    MalformedRecord,
    /// Startup configuration is missing or invalid.
    BadConfig,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ClientCode::StoreRejected => "STORE_REJECTED",
            ClientCode::Conflict => "CONFLICT",
            ClientCode::MalformedRecord => "MALFORMED_RECORD",
            ClientCode::BadConfig => "BAD_CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CounterError>;

/// Unified error type used by core and gateway.
///
/// Record-not-found has no variant here; reads report it as
/// [`crate::store::ReadOutcome::NotFound`].
#[derive(Debug, Error)]
pub enum CounterError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl CounterError {
    pub fn client_code(&self) -> ClientCode {
        match self {
            CounterError::Unavailable(_) => ClientCode::StoreUnavailable,
            CounterError::Rejected { .. } => ClientCode::StoreRejected,
            CounterError::Conflict(_) => ClientCode::Conflict,
            CounterError::Malformed(_) => ClientCode::MalformedRecord,
            CounterError::Config(_) => ClientCode::BadConfig,
            CounterError::Internal(_) => ClientCode::Internal,
        }
    }

    /// True for failures that came back from a store operation.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            CounterError::Unavailable(_)
                | CounterError::Rejected { .. }
                | CounterError::Conflict(_)
                | CounterError::Malformed(_)
        )
    }
}

impl From<serde_json::Error> for CounterError {
    fn from(e: serde_json::Error) -> Self {
        CounterError::Malformed(e.to_string())
    }
}
