//! Decision request assembly.
//!
//! The assembler performs no I/O: every input has already been resolved by
//! the classifier, the store and the group access resolver.

use docgate_abac::{
    ContextAttributes, DecisionRequest, PrincipalAttributes, RequestError, ResourceAttributes,
};
use docgate_network::NetworkContext;
use docgate_types::{Action, Document, Principal};

/// Builds decision requests from resolved inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAssembler;

impl ContextAssembler {
    /// Request for a collection-level action (list, create).
    ///
    /// Group access is fixed to `true`: there is no document yet, so role
    /// alone governs.
    pub fn collection(
        self,
        principal: &Principal,
        action: Action,
        network: NetworkContext,
    ) -> Result<DecisionRequest, RequestError> {
        DecisionRequest::new(
            PrincipalAttributes::from(principal),
            action,
            ResourceAttributes::Collection,
            ContextAttributes {
                network,
                has_group_access: true,
            },
        )
    }

    /// Request for an item-level action (read, update, delete) on a fetched document.
    pub fn item(
        self,
        principal: &Principal,
        action: Action,
        document: &Document,
        has_group_access: bool,
        network: NetworkContext,
    ) -> Result<DecisionRequest, RequestError> {
        DecisionRequest::new(
            PrincipalAttributes::from(principal),
            action,
            ResourceAttributes::document(document.id.clone(), document.owner_id.clone()),
            ContextAttributes {
                network,
                has_group_access,
            },
        )
    }
}
