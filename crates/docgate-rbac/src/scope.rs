//! Visibility scopes for bulk listing.

use docgate_types::{DocumentGroupId, Role, UserGroupId};
use serde::{Deserialize, Serialize};

/// The set of documents a principal may see, as a query-shaping rule.
///
/// A scope selects exactly the documents for which the per-item group access
/// check would succeed, without evaluating that check row by row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "group", rename_all = "snake_case")]
pub enum VisibilityScope {
    /// Every document, unfiltered.
    All,
    /// Ungrouped documents plus documents whose group is associated with this
    /// principal group.
    UngroupedOr(UserGroupId),
    /// Ungrouped documents only.
    UngroupedOnly,
}

impl VisibilityScope {
    /// Derives the scope for a principal.
    pub fn for_principal(role: Role, group: Option<&UserGroupId>) -> Self {
        if role.is_privileged() {
            return Self::All;
        }
        match group.filter(|g| !g.as_str().trim().is_empty()) {
            Some(group) => Self::UngroupedOr(group.clone()),
            None => Self::UngroupedOnly,
        }
    }

    /// The principal group whose associations widen this scope.
    ///
    /// A blank group widens nothing, so `UngroupedOr` with a blank group
    /// behaves like [`VisibilityScope::UngroupedOnly`].
    pub fn widening_group(&self) -> Option<&UserGroupId> {
        match self {
            Self::UngroupedOr(group) if !group.as_str().trim().is_empty() => Some(group),
            _ => None,
        }
    }

    /// Returns whether a document in `document_group` is inside this scope.
    ///
    /// `association_exists` answers whether the given document group is
    /// associated with the scope's principal group; it is only consulted for
    /// grouped documents under a non-blank [`VisibilityScope::UngroupedOr`].
    pub fn permits<F>(&self, document_group: Option<&DocumentGroupId>, association_exists: F) -> bool
    where
        F: FnOnce(&UserGroupId, &DocumentGroupId) -> bool,
    {
        let Some(document_group) = document_group.filter(|g| !g.as_str().trim().is_empty()) else {
            return true;
        };
        match self {
            Self::All => true,
            Self::UngroupedOr(_) | Self::UngroupedOnly => self
                .widening_group()
                .is_some_and(|user_group| association_exists(user_group, document_group)),
        }
    }
}
