//! Shared error type across nexus crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed config.
    BadRequest,
    /// Unknown feed or scenario.
    NotFound,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, NexusError>;

/// Unified error type used by core and gateway.
///
/// The jitter feed itself never produces one of these; they come from the
/// surrounding config, lookup and serving paths.
#[derive(Debug, Error)]
pub enum NexusError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl NexusError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            NexusError::BadRequest(_) => ClientCode::BadRequest,
            NexusError::NotFound(_) => ClientCode::NotFound,
            NexusError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            NexusError::Internal(_) => ClientCode::Internal,
        }
    }
}
