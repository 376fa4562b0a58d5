//! JSON seed data for the in-memory store.

use std::path::Path;

use docgate_types::{Document, DocumentGroupId, UserGroupId};
use serde::{Deserialize, Serialize};

use crate::{StoreError, StoreResult};

/// One (document group, user group) pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub document_group_id: DocumentGroupId,
    pub user_group_id: UserGroupId,
}

/// Initial contents of a [`MemoryStore`](crate::MemoryStore).
///
/// ```json
/// {
///   "documents": [{ "id": "doc-1", "title": "..", "content": "..", "owner_id": "alice",
///                   "document_group_id": "finance",
///                   "created_at": "2025-01-08T10:00:00Z", "updated_at": "2025-01-08T10:00:00Z" }],
///   "associations": [{ "document_group_id": "finance", "user_group_id": "g1" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub documents: Vec<Document>,
    pub associations: Vec<Association>,
}

impl SeedData {
    pub fn from_json(json: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> StoreResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| StoreError::SeedIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}
