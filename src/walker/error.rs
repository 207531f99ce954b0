//! Walker error taxonomy.

use thiserror::Error;

use crate::resilience::Retryable;
use crate::rpc::types::RpcError;

/// Errors surfaced by table walk operations. They reach the caller unchanged;
/// the walker performs no recovery of its own.
#[derive(Debug, Error)]
pub enum WalkError {
    /// Requested object, field or key is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Pagination token rejected by the remote service.
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// Transport failure, timeout or malformed response.
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),
}

impl From<RpcError> for WalkError {
    fn from(e: RpcError) -> Self {
        WalkError::RemoteUnavailable(e.to_string())
    }
}

impl Retryable for WalkError {
    fn is_retryable(&self) -> bool {
        matches!(self, WalkError::RemoteUnavailable(_))
    }
}

/// Result type for walk operations.
pub type WalkResult<T> = Result<T, WalkError>;
