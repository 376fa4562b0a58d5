//! # docgate-types: Core types for `docgate`
//!
//! This crate contains shared types used across the `docgate` system:
//! - Entity IDs ([`PrincipalId`], [`DocumentId`], [`DocumentGroupId`], [`UserGroupId`])
//! - Caller identity ([`Role`], [`Principal`])
//! - Operations ([`Action`], [`ActionScope`])
//! - Stored resources ([`Document`], [`DocumentInput`])

use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Entity IDs - opaque strings supplied by callers or the store
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Parses an optional identifier, treating empty or blank input as absent.
            pub fn parse_optional(raw: Option<&str>) -> Option<Self> {
                raw.map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| Self(s.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identity of a caller, as asserted by the upstream authentication layer.
    PrincipalId
);

string_id!(
    /// Unique identifier for a stored document.
    DocumentId
);

string_id!(
    /// Group a document has opted into.
    ///
    /// Distinct from [`UserGroupId`] so the two sides of a group association
    /// cannot be swapped by accident.
    DocumentGroupId
);

string_id!(
    /// Group a principal belongs to.
    UserGroupId
);

// ============================================================================
// Role
// ============================================================================

/// Role of a principal.
///
/// Roles are a small closed set; anything else is rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access to visible documents.
    Viewer,
    /// Read and write access to visible documents.
    Editor,
    /// Full access to every document regardless of group.
    Admin,
}

impl Role {
    /// All roles, least privileged first.
    pub const ALL: [Role; 3] = [Role::Viewer, Role::Editor, Role::Admin];

    /// Returns the lowercase role name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Editor => "editor",
            Role::Admin => "admin",
        }
    }

    /// Returns whether this role bypasses group scoping.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0:?}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

// ============================================================================
// Principal
// ============================================================================

/// The caller of an operation: identity, role and optional group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub role: Role,
    pub group: Option<UserGroupId>,
}

impl Principal {
    /// Creates a principal without a group.
    pub fn new(id: impl Into<PrincipalId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            group: None,
        }
    }

    /// Sets the principal's group.
    pub fn with_group(mut self, group: impl Into<UserGroupId>) -> Self {
        self.group = Some(group.into());
        self
    }
}

// ============================================================================
// Action
// ============================================================================

/// Whether an action targets the collection or a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionScope {
    /// No specific document exists yet (list, create).
    Collection,
    /// Operates on one fetched document (read, update, delete).
    Item,
}

/// Operation a principal asks to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    ListDocuments,
    GetDocument,
    CreateDocument,
    UpdateDocument,
    DeleteDocument,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::ListDocuments,
        Action::GetDocument,
        Action::CreateDocument,
        Action::UpdateDocument,
        Action::DeleteDocument,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ListDocuments => "ListDocuments",
            Action::GetDocument => "GetDocument",
            Action::CreateDocument => "CreateDocument",
            Action::UpdateDocument => "UpdateDocument",
            Action::DeleteDocument => "DeleteDocument",
        }
    }

    pub fn scope(&self) -> ActionScope {
        match self {
            Action::ListDocuments | Action::CreateDocument => ActionScope::Collection,
            Action::GetDocument | Action::UpdateDocument | Action::DeleteDocument => {
                ActionScope::Item
            }
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Document
// ============================================================================

/// A stored document.
///
/// `owner_id` and `group_id` are fixed at creation; updates only touch
/// `title`, `content` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub content: String,
    pub owner_id: PrincipalId,
    #[serde(rename = "document_group_id", default)]
    pub group_id: Option<DocumentGroupId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Creates an ungrouped document stamped with `now`.
    pub fn new(
        id: DocumentId,
        owner_id: PrincipalId,
        input: DocumentInput,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: input.title,
            content: input.content,
            owner_id,
            group_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Places the document in a group.
    pub fn with_group(mut self, group: impl Into<DocumentGroupId>) -> Self {
        self.group_id = Some(group.into());
        self
    }
}

/// Caller-supplied fields for creating or updating a document.
///
/// Missing fields decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentInput {
    pub title: String,
    pub content: String,
}

impl DocumentInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests;
