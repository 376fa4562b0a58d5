//! Unit tests for docgate-types

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use test_case::test_case;

use crate::{
    Action, ActionScope, Document, DocumentGroupId, DocumentId, DocumentInput, Principal,
    PrincipalId, Role, UserGroupId,
};

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn parse_optional_treats_blank_as_absent() {
    assert_eq!(UserGroupId::parse_optional(None), None);
    assert_eq!(UserGroupId::parse_optional(Some("")), None);
    assert_eq!(UserGroupId::parse_optional(Some("   ")), None);
    assert_eq!(
        UserGroupId::parse_optional(Some(" g1 ")),
        Some(UserGroupId::new("g1"))
    );
}

#[test]
fn ids_serialize_as_plain_strings() {
    let id = DocumentGroupId::new("finance");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"finance\"");
}

// ============================================================================
// Role
// ============================================================================

#[test_case("admin" => Ok(Role::Admin); "admin")]
#[test_case("Editor" => Ok(Role::Editor); "mixed case editor")]
#[test_case(" viewer " => Ok(Role::Viewer); "padded viewer")]
#[test_case("root" => Err(()); "unknown role")]
#[test_case("" => Err(()); "empty role")]
fn role_parsing(raw: &str) -> Result<Role, ()> {
    raw.parse::<Role>().map_err(|_| ())
}

#[test]
fn only_admin_is_privileged() {
    assert!(Role::Admin.is_privileged());
    assert!(!Role::Editor.is_privileged());
    assert!(!Role::Viewer.is_privileged());
}

#[test]
fn role_display_round_trips_through_from_str() {
    for role in Role::ALL {
        assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
    }
}

// ============================================================================
// Action
// ============================================================================

#[test_case(Action::ListDocuments => ActionScope::Collection; "list")]
#[test_case(Action::CreateDocument => ActionScope::Collection; "create")]
#[test_case(Action::GetDocument => ActionScope::Item; "get")]
#[test_case(Action::UpdateDocument => ActionScope::Item; "update")]
#[test_case(Action::DeleteDocument => ActionScope::Item; "delete")]
fn action_scope(action: Action) -> ActionScope {
    action.scope()
}

// ============================================================================
// Principal / Document
// ============================================================================

#[test]
fn principal_builder() {
    let principal = Principal::new("alice", Role::Editor).with_group("g1");
    assert_eq!(principal.id, PrincipalId::new("alice"));
    assert_eq!(principal.group, Some(UserGroupId::new("g1")));
}

#[test]
fn new_document_is_ungrouped_with_equal_timestamps() {
    let now = Utc.with_ymd_and_hms(2025, 1, 8, 10, 0, 0).unwrap();
    let doc = Document::new(
        DocumentId::new("doc-1"),
        PrincipalId::new("alice"),
        DocumentInput::new("title", "body"),
        now,
    );

    assert!(doc.group_id.is_none());
    assert_eq!(doc.created_at, doc.updated_at);
}

#[test]
fn document_group_uses_wire_field_name() {
    let now = Utc.with_ymd_and_hms(2025, 1, 8, 10, 0, 0).unwrap();
    let doc = Document::new(
        DocumentId::new("doc-1"),
        PrincipalId::new("alice"),
        DocumentInput::default(),
        now,
    )
    .with_group("finance");

    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["document_group_id"], "finance");
    assert_eq!(json["owner_id"], "alice");
}

#[test]
fn document_input_missing_fields_decode_empty() {
    let input: DocumentInput = serde_json::from_str(r#"{"title":"only"}"#).unwrap();
    assert_eq!(input, DocumentInput::new("only", ""));
}

proptest! {
    /// Property: non-blank identifiers survive `parse_optional` trimmed
    #[test]
    fn prop_parse_optional_keeps_non_blank(raw in "[a-z0-9-]{1,16}") {
        let parsed = DocumentGroupId::parse_optional(Some(&raw));
        prop_assert_eq!(parsed, Some(DocumentGroupId::new(raw)));
    }
}
