//! Scope enforcement.
//!
//! Renders a [`VisibilityScope`] as a SQL predicate for stores that can push
//! the filter down to the query.

use thiserror::Error;
use tracing::{error, info};

use docgate_types::UserGroupId;

use crate::scope::VisibilityScope;

/// Table holding (document group, user group) pairings.
pub const ASSOCIATIONS_TABLE: &str = "group_associations";

/// Column holding a document's group.
pub const DOCUMENT_GROUP_COLUMN: &str = "document_group_id";

/// Column holding an association's user group.
pub const USER_GROUP_COLUMN: &str = "user_group_id";

/// Error type for scope enforcement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// A group id could not be embedded safely in the predicate.
    #[error("Invalid user group id in visibility scope: {0:?}")]
    InvalidGroupId(String),
}

/// Result type for enforcement operations.
pub type Result<T> = std::result::Result<T, ScopeError>;

/// Renders visibility scopes as row filters.
pub struct ScopeEnforcer {
    scope: VisibilityScope,

    /// Whether to log scope decisions.
    audit_enabled: bool,
}

impl ScopeEnforcer {
    pub fn new(scope: VisibilityScope) -> Self {
        Self {
            scope,
            audit_enabled: true,
        }
    }

    /// Disables audit logging (for testing).
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// Generates a WHERE clause for the scope.
    ///
    /// Returns an empty string for [`VisibilityScope::All`]. A blank principal
    /// group renders the ungrouped-only predicate. Other group identifiers are
    /// embedded as quoted literals and rejected if they contain quotes or
    /// backslashes.
    pub fn generate_where_clause(&self) -> Result<String> {
        let clause = match (&self.scope, self.scope.widening_group()) {
            (VisibilityScope::All, _) => String::new(),
            (_, None) => format!("{DOCUMENT_GROUP_COLUMN} IS NULL"),
            (_, Some(group)) => {
                let literal = match quote_group_id(group) {
                    Ok(literal) => literal,
                    Err(e) => {
                        if self.audit_enabled {
                            error!(group = %group, "Rejected user group in visibility scope");
                        }
                        return Err(e);
                    }
                };
                format!(
                    "{DOCUMENT_GROUP_COLUMN} IS NULL OR {DOCUMENT_GROUP_COLUMN} IN \
                     (SELECT {DOCUMENT_GROUP_COLUMN} FROM {ASSOCIATIONS_TABLE} \
                     WHERE {USER_GROUP_COLUMN} = {literal})"
                )
            }
        };

        if self.audit_enabled {
            info!(
                scope = ?self.scope,
                where_clause = %clause,
                "Visibility scope applied"
            );
        }

        Ok(clause)
    }

    /// Returns the scope being enforced.
    pub fn scope(&self) -> &VisibilityScope {
        &self.scope
    }
}

/// Quotes a user group id as a SQL string literal.
fn quote_group_id(group: &UserGroupId) -> Result<String> {
    let id = group.as_str();
    if id.is_empty() || id.contains(['\'', '\\']) {
        return Err(ScopeError::InvalidGroupId(id.to_string()));
    }
    Ok(format!("'{id}'"))
}
