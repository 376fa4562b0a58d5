//! Store capabilities consumed by the gateway.
//!
//! The [`DocumentStore`] and [`AssociationStore`] traits abstract the
//! persistence layer so the authorization core can be exercised against the
//! in-memory store, a relational backend, or failing test doubles.

use chrono::{DateTime, Utc};
use docgate_rbac::VisibilityScope;
use docgate_types::{Document, DocumentGroupId, DocumentId, DocumentInput, UserGroupId};

use crate::StoreResult;

/// Document persistence.
pub trait DocumentStore: Send + Sync {
    /// Looks up one document. `Ok(None)` means absent, not an error.
    fn fetch(&self, id: &DocumentId) -> StoreResult<Option<Document>>;

    /// Returns every document inside `scope`, newest first.
    fn list(&self, scope: &VisibilityScope) -> StoreResult<Vec<Document>>;

    /// Stores a new document.
    fn insert(&self, document: Document) -> StoreResult<Document>;

    /// Replaces title and content and stamps `updated_at`.
    ///
    /// Owner, group and creation time are never changed. Returns `Ok(None)`
    /// if the document does not exist.
    fn update(
        &self,
        id: &DocumentId,
        input: DocumentInput,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Document>>;

    /// Removes a document. Returns whether it existed.
    fn delete(&self, id: &DocumentId) -> StoreResult<bool>;
}

/// Group association lookups.
pub trait AssociationStore: Send + Sync {
    /// Returns whether `document_group` is associated with exactly `user_group`.
    fn association_exists(
        &self,
        user_group: &UserGroupId,
        document_group: &DocumentGroupId,
    ) -> StoreResult<bool>;

    /// Records a pairing. Duplicate pairings are rejected.
    fn associate(&self, document_group: DocumentGroupId, user_group: UserGroupId)
    -> StoreResult<()>;
}
