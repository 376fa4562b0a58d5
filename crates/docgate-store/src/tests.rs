//! Unit tests for docgate-store


use chrono::{DateTime, Duration, TimeZone, Utc};
use docgate_rbac::VisibilityScope;
use docgate_types::{Document, DocumentGroupId, DocumentId, DocumentInput, PrincipalId, UserGroupId};
use proptest::prelude::*;

use crate::{AssociationStore, DocumentStore, MemoryStore, SeedData, StoreError};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 8, 10, 0, 0).unwrap()
}

fn doc(id: &str, group: Option<&str>, minutes: i64) -> Document {
    let doc = Document::new(
        DocumentId::new(id),
        PrincipalId::new("alice"),
        DocumentInput::new(format!("title {id}"), "body"),
        epoch() + Duration::minutes(minutes),
    );
    match group {
        Some(g) => doc.with_group(g),
        None => doc,
    }
}

fn ids(docs: &[Document]) -> Vec<&str> {
    docs.iter().map(|d| d.id.as_str()).collect()
}

fn sample_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert(doc("open", None, 0)).unwrap();
    store.insert(doc("fin", Some("finance"), 1)).unwrap();
    store.insert(doc("hr", Some("hr"), 2)).unwrap();
    store
        .associate(DocumentGroupId::new("finance"), UserGroupId::new("g1"))
        .unwrap();
    store
}

// ============================================================================
// Documents
// ============================================================================

#[test]
fn fetch_missing_is_none() {
    let store = MemoryStore::new();
    assert!(store.fetch(&DocumentId::new("nope")).unwrap().is_none());
}

#[test]
fn insert_rejects_duplicate_id() {
    let store = MemoryStore::new();
    store.insert(doc("a", None, 0)).unwrap();
    assert!(matches!(
        store.insert(doc("a", None, 1)),
        Err(StoreError::DuplicateDocument(id)) if id.as_str() == "a"
    ));
}

#[test]
fn update_preserves_owner_group_and_creation() {
    let store = sample_store();
    let later = epoch() + Duration::hours(1);

    let updated = store
        .update(
            &DocumentId::new("fin"),
            DocumentInput::new("new title", "new body"),
            later,
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "new title");
    assert_eq!(updated.content, "new body");
    assert_eq!(updated.owner_id.as_str(), "alice");
    assert_eq!(updated.group_id, Some(DocumentGroupId::new("finance")));
    assert_eq!(updated.created_at, epoch() + Duration::minutes(1));
    assert_eq!(updated.updated_at, later);

    assert!(store
        .update(&DocumentId::new("nope"), DocumentInput::default(), later)
        .unwrap()
        .is_none());
}

#[test]
fn delete_reports_existence() {
    let store = sample_store();
    assert!(store.delete(&DocumentId::new("hr")).unwrap());
    assert!(!store.delete(&DocumentId::new("hr")).unwrap());
    assert_eq!(store.document_count().unwrap(), 2);
}

// ============================================================================
// Listing
// ============================================================================

#[test]
fn list_all_newest_first() {
    let store = sample_store();
    let docs = store.list(&VisibilityScope::All).unwrap();
    assert_eq!(ids(&docs), ["hr", "fin", "open"]);
}

#[test]
fn list_ungrouped_only() {
    let store = sample_store();
    let docs = store.list(&VisibilityScope::UngroupedOnly).unwrap();
    assert_eq!(ids(&docs), ["open"]);
}

#[test]
fn list_ungrouped_or_associated() {
    let store = sample_store();

    let g1 = store
        .list(&VisibilityScope::UngroupedOr(UserGroupId::new("g1")))
        .unwrap();
    assert_eq!(ids(&g1), ["fin", "open"]);

    let g2 = store
        .list(&VisibilityScope::UngroupedOr(UserGroupId::new("g2")))
        .unwrap();
    assert_eq!(ids(&g2), ["open"]);
}

#[test]
fn list_blank_group_ignores_blank_associations() {
    let store = sample_store();
    store
        .associate(DocumentGroupId::new("hr"), UserGroupId::new(""))
        .unwrap();

    let docs = store
        .list(&VisibilityScope::UngroupedOr(UserGroupId::new("")))
        .unwrap();
    assert_eq!(ids(&docs), ["open"]);
}

// ============================================================================
// Associations
// ============================================================================

#[test]
fn associations_are_exact_pairs() {
    let store = sample_store();
    let finance = DocumentGroupId::new("finance");

    assert!(store
        .association_exists(&UserGroupId::new("g1"), &finance)
        .unwrap());
    assert!(!store
        .association_exists(&UserGroupId::new("g2"), &finance)
        .unwrap());
    assert!(!store
        .association_exists(&UserGroupId::new("g1"), &DocumentGroupId::new("hr"))
        .unwrap());
}

#[test]
fn duplicate_association_rejected() {
    let store = sample_store();
    let result = store.associate(DocumentGroupId::new("finance"), UserGroupId::new("g1"));
    assert!(matches!(
        result,
        Err(StoreError::DuplicateAssociation { .. })
    ));
}

#[test]
fn poisoned_lock_is_unavailable() {
    let store = sample_store();
    store.poison_associations();

    let result = store.association_exists(&UserGroupId::new("g1"), &DocumentGroupId::new("finance"));
    assert!(matches!(result, Err(StoreError::Unavailable(_))));
    assert!(matches!(
        store.list(&VisibilityScope::UngroupedOr(UserGroupId::new("g1"))),
        Err(StoreError::Unavailable(_))
    ));
    // Documents lock is untouched.
    assert!(store.fetch(&DocumentId::new("open")).unwrap().is_some());
}

// ============================================================================
// Seeding
// ============================================================================

#[test]
fn seed_from_json() {
    let json = r#"{
        "documents": [
            {
                "id": "doc-1",
                "title": "Budget",
                "content": "numbers",
                "owner_id": "alice",
                "document_group_id": "finance",
                "created_at": "2025-01-08T10:00:00Z",
                "updated_at": "2025-01-08T10:00:00Z"
            },
            {
                "id": "doc-2",
                "title": "Welcome",
                "content": "hello",
                "owner_id": "bob",
                "created_at": "2025-01-08T11:00:00Z",
                "updated_at": "2025-01-08T11:00:00Z"
            }
        ],
        "associations": [
            { "document_group_id": "finance", "user_group_id": "g1" }
        ]
    }"#;

    let store = MemoryStore::from_seed(SeedData::from_json(json).unwrap()).unwrap();
    assert_eq!(store.document_count().unwrap(), 2);
    assert!(store
        .association_exists(&UserGroupId::new("g1"), &DocumentGroupId::new("finance"))
        .unwrap());
    assert!(store
        .fetch(&DocumentId::new("doc-2"))
        .unwrap()
        .unwrap()
        .group_id
        .is_none());
}

#[test]
fn seed_with_duplicate_pair_rejected() {
    let json = r#"{
        "associations": [
            { "document_group_id": "finance", "user_group_id": "g1" },
            { "document_group_id": "finance", "user_group_id": "g1" }
        ]
    }"#;
    let seed = SeedData::from_json(json).unwrap();
    assert!(MemoryStore::from_seed(seed).is_err());
}

#[test]
fn seed_load_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        SeedData::load(&dir.path().join("missing.json")),
        Err(StoreError::SeedIo { .. })
    ));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    assert!(matches!(SeedData::load(&bad), Err(StoreError::SeedParse(_))));
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Property: listing is always sorted newest first
    #[test]
    fn prop_list_sorted_desc(offsets in prop::collection::vec(0i64..10_000, 0..20)) {
        let store = MemoryStore::new();
        for (i, minutes) in offsets.iter().enumerate() {
            store.insert(doc(&format!("d{i}"), None, *minutes)).unwrap();
        }
        let docs = store.list(&VisibilityScope::All).unwrap();
        prop_assert_eq!(docs.len(), offsets.len());
        prop_assert!(docs.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }
}
