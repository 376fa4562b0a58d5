//! Network classification error types.

use thiserror::Error;

/// Result type for range table construction.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Errors raised while building range tables.
///
/// Classification itself never fails; these only surface when a range table
/// is built from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// A CIDR block could not be parsed.
    #[error("invalid address range {input:?}: {reason}")]
    InvalidRange { input: String, reason: String },
}

impl NetworkError {
    pub(crate) fn invalid_range(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
