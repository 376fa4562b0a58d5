//! Group access resolution for single documents.

use docgate_store::AssociationStore;
use docgate_types::{DocumentGroupId, UserGroupId};
use tracing::warn;

/// Decides whether a principal group may reach a document group.
///
/// Rules, in order:
/// 1. An ungrouped document is reachable by everyone.
/// 2. A grouped document is unreachable by an ungrouped principal.
/// 3. Otherwise access requires an association for exactly this pair.
///
/// Lookup failures deny.
pub struct GroupAccessResolver<'a, A: ?Sized> {
    associations: &'a A,
}

impl<'a, A: AssociationStore + ?Sized> GroupAccessResolver<'a, A> {
    pub fn new(associations: &'a A) -> Self {
        Self { associations }
    }

    pub fn has_access(
        &self,
        principal_group: Option<&UserGroupId>,
        resource_group: Option<&DocumentGroupId>,
    ) -> bool {
        let Some(resource_group) = resource_group.filter(|g| !g.as_str().trim().is_empty()) else {
            return true;
        };
        let Some(principal_group) = principal_group.filter(|g| !g.as_str().trim().is_empty())
        else {
            return false;
        };

        match self
            .associations
            .association_exists(principal_group, resource_group)
        {
            Ok(exists) => exists,
            Err(e) => {
                warn!(
                    user_group = %principal_group,
                    document_group = %resource_group,
                    error = %e,
                    "Association lookup failed; denying group access"
                );
                false
            }
        }
    }
}
