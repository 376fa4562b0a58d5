//! In-memory store.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use docgate_rbac::VisibilityScope;
use docgate_types::{Document, DocumentGroupId, DocumentId, DocumentInput, UserGroupId};
use tracing::{debug, info};

use crate::seed::SeedData;
use crate::{AssociationStore, DocumentStore, StoreError, StoreResult};

/// Documents and associations held behind `RwLock`s.
///
/// Readers never block each other. A poisoned lock makes every subsequent
/// call return [`StoreError::Unavailable`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<DocumentId, Document>>,
    associations: RwLock<BTreeSet<(DocumentGroupId, UserGroupId)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from seed data.
    ///
    /// Duplicate document ids or association pairs in the seed are errors.
    pub fn from_seed(seed: SeedData) -> StoreResult<Self> {
        let store = Self::new();
        let (documents, associations) = (seed.documents.len(), seed.associations.len());

        for document in seed.documents {
            store.insert(document)?;
        }
        for association in seed.associations {
            store.associate(association.document_group_id, association.user_group_id)?;
        }

        info!(documents, associations, "Memory store seeded");
        Ok(store)
    }

    /// Number of stored documents.
    pub fn document_count(&self) -> StoreResult<usize> {
        Ok(self
            .documents
            .read()
            .map_err(|_| StoreError::poisoned("documents"))?
            .len())
    }

    /// Panics a thread while it holds the association write lock.
    #[cfg(test)]
    pub(crate) fn poison_associations(&self) {
        std::thread::scope(|scope| {
            let _ = scope
                .spawn(|| {
                    let _guard = self.associations.write();
                    panic!("association lock poisoned");
                })
                .join();
        });
    }

    /// Document groups associated with `user_group`.
    fn groups_for(&self, user_group: &UserGroupId) -> StoreResult<HashSet<DocumentGroupId>> {
        let associations = self
            .associations
            .read()
            .map_err(|_| StoreError::poisoned("associations"))?;
        Ok(associations
            .iter()
            .filter(|(_, u)| u == user_group)
            .map(|(d, _)| d.clone())
            .collect())
    }
}

impl DocumentStore for MemoryStore {
    fn fetch(&self, id: &DocumentId) -> StoreResult<Option<Document>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::poisoned("documents"))?;
        Ok(documents.get(id).cloned())
    }

    fn list(&self, scope: &VisibilityScope) -> StoreResult<Vec<Document>> {
        // Snapshot the principal's groups first so only one lock is held at a time.
        let visible_groups = match scope.widening_group() {
            Some(user_group) => self.groups_for(user_group)?,
            None => HashSet::new(),
        };

        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::poisoned("documents"))?;

        let mut listed: Vec<Document> = documents
            .values()
            .filter(|doc| {
                scope.permits(doc.group_id.as_ref(), |_, group| {
                    visible_groups.contains(group)
                })
            })
            .cloned()
            .collect();
        drop(documents);

        listed.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        debug!(scope = ?scope, count = listed.len(), "Documents listed");
        Ok(listed)
    }

    fn insert(&self, document: Document) -> StoreResult<Document> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::poisoned("documents"))?;

        if documents.contains_key(&document.id) {
            return Err(StoreError::DuplicateDocument(document.id));
        }
        documents.insert(document.id.clone(), document.clone());
        Ok(document)
    }

    fn update(
        &self,
        id: &DocumentId,
        input: DocumentInput,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Document>> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::poisoned("documents"))?;

        Ok(documents.get_mut(id).map(|doc| {
            doc.title = input.title;
            doc.content = input.content;
            doc.updated_at = now;
            doc.clone()
        }))
    }

    fn delete(&self, id: &DocumentId) -> StoreResult<bool> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::poisoned("documents"))?;
        Ok(documents.remove(id).is_some())
    }
}

impl AssociationStore for MemoryStore {
    fn association_exists(
        &self,
        user_group: &UserGroupId,
        document_group: &DocumentGroupId,
    ) -> StoreResult<bool> {
        let associations = self
            .associations
            .read()
            .map_err(|_| StoreError::poisoned("associations"))?;
        Ok(associations.contains(&(document_group.clone(), user_group.clone())))
    }

    fn associate(
        &self,
        document_group: DocumentGroupId,
        user_group: UserGroupId,
    ) -> StoreResult<()> {
        let mut associations = self
            .associations
            .write()
            .map_err(|_| StoreError::poisoned("associations"))?;

        if associations.contains(&(document_group.clone(), user_group.clone())) {
            return Err(StoreError::DuplicateAssociation {
                document_group,
                user_group,
            });
        }
        associations.insert((document_group, user_group));
        Ok(())
    }
}
