//! Store error types.

use docgate_types::{DocumentGroupId, DocumentId, UserGroupId};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store cannot serve requests.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A document with this id already exists.
    #[error("document already exists: {0}")]
    DuplicateDocument(DocumentId),

    /// The pairing is already recorded.
    #[error("association already exists: {document_group} <-> {user_group}")]
    DuplicateAssociation {
        document_group: DocumentGroupId,
        user_group: UserGroupId,
    },

    /// Seed file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    SeedIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Seed file is not valid JSON seed data.
    #[error("failed to parse seed data: {0}")]
    SeedParse(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn poisoned(what: &str) -> Self {
        Self::Unavailable(format!("{what} lock poisoned"))
    }
}
