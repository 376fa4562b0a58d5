//! Attribute types for policy evaluation.
//!
//! A [`DecisionRequest`] groups three attribute categories with the action:
//! - **Principal attributes**: identity, role, optional group
//! - **Resource attributes**: the collection, or one document and its owner
//! - **Context attributes**: network origin and the resolved group-access flag
//!
//! Requests are validated once by [`DecisionRequest::new`]. The evaluator can
//! then rely on the action scope and resource shape agreeing.

use docgate_network::NetworkContext;
use docgate_types::{Action, ActionScope, DocumentId, Principal, PrincipalId, Role, UserGroupId};
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Principal Attributes
// ============================================================================

/// Attributes describing the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrincipalAttributes {
    pub id: PrincipalId,
    pub role: Role,
    pub group: Option<UserGroupId>,
}

impl From<&Principal> for PrincipalAttributes {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id.clone(),
            role: principal.role,
            group: principal.group.clone(),
        }
    }
}

// ============================================================================
// Resource Attributes
// ============================================================================

/// Attributes describing the target of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceAttributes {
    /// The document collection as a whole (list, create).
    Collection,
    /// One existing document.
    Document { id: DocumentId, owner: PrincipalId },
}

impl ResourceAttributes {
    pub fn document(id: impl Into<DocumentId>, owner: impl Into<PrincipalId>) -> Self {
        Self::Document {
            id: id.into(),
            owner: owner.into(),
        }
    }

    fn scope(&self) -> ActionScope {
        match self {
            Self::Collection => ActionScope::Collection,
            Self::Document { .. } => ActionScope::Item,
        }
    }

    /// Returns the document owner, if this is a document.
    pub fn owner(&self) -> Option<&PrincipalId> {
        match self {
            Self::Collection => None,
            Self::Document { owner, .. } => Some(owner),
        }
    }
}

// ============================================================================
// Context Attributes
// ============================================================================

/// Request context: where the call came from and whether group scoping passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextAttributes {
    pub network: NetworkContext,
    /// Always `true` for collection-level actions.
    pub has_group_access: bool,
}

// ============================================================================
// Decision Request
// ============================================================================

/// Errors raised when a decision request is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("principal id must not be empty")]
    EmptyPrincipalId,

    #[error("action {action} requires a {expected:?}-level resource")]
    ResourceMismatch {
        action: Action,
        expected: ActionScope,
    },

    #[error("document id must not be empty")]
    EmptyDocumentId,

    #[error("document owner must not be empty")]
    EmptyOwner,
}

/// A fully validated request for a policy decision.
///
/// Constructed fresh per operation and consumed once by a
/// [`DecisionEngine`](crate::DecisionEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionRequest {
    principal: PrincipalAttributes,
    action: Action,
    resource: ResourceAttributes,
    context: ContextAttributes,
}

impl DecisionRequest {
    /// Validates and builds a request.
    ///
    /// # Errors
    ///
    /// - [`RequestError::EmptyPrincipalId`] if the principal has no identity
    /// - [`RequestError::ResourceMismatch`] if the resource shape disagrees
    ///   with the action's scope
    /// - [`RequestError::EmptyDocumentId`] / [`RequestError::EmptyOwner`] for
    ///   an incomplete document
    pub fn new(
        principal: PrincipalAttributes,
        action: Action,
        resource: ResourceAttributes,
        context: ContextAttributes,
    ) -> Result<Self, RequestError> {
        if principal.id.as_str().trim().is_empty() {
            return Err(RequestError::EmptyPrincipalId);
        }

        let expected = action.scope();
        if resource.scope() != expected {
            return Err(RequestError::ResourceMismatch { action, expected });
        }

        if let ResourceAttributes::Document { id, owner } = &resource {
            if id.is_empty() {
                return Err(RequestError::EmptyDocumentId);
            }
            if owner.is_empty() {
                return Err(RequestError::EmptyOwner);
            }
        }

        Ok(Self {
            principal,
            action,
            resource,
            context,
        })
    }

    pub fn principal(&self) -> &PrincipalAttributes {
        &self.principal
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn resource(&self) -> &ResourceAttributes {
        &self.resource
    }

    pub fn context(&self) -> &ContextAttributes {
        &self.context
    }

    /// Returns whether the principal owns the target document.
    pub fn is_owner(&self) -> bool {
        self.resource
            .owner()
            .is_some_and(|owner| *owner == self.principal.id)
    }
}
