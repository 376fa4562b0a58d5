//! Error types for gateway operations.

use docgate_abac::RequestError;
use docgate_store::StoreError;
use docgate_types::DocumentId;
use thiserror::Error;

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Outcome of a rejected or failed gateway operation.
///
/// `NotFound` and `Forbidden` both reject the operation but stay distinct so
/// callers can tell a missing document from a refused one.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The caller supplied attributes the decision request cannot carry.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The document does not exist.
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    /// The policy denied the operation, or the decision could not be made.
    #[error("access denied: {reason}")]
    Forbidden { reason: String },

    /// The store failed while serving an authorized operation.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<RequestError> for GatewayError {
    fn from(err: RequestError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
