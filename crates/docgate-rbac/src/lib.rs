//! # docgate-rbac: Role and group visibility scoping
//!
//! Listing documents must return exactly the documents the per-item group
//! check would admit. This crate expresses that rule as a
//! [`VisibilityScope`]:
//!
//! | Principal               | Scope                                      |
//! |-------------------------|--------------------------------------------|
//! | admin                   | all documents                              |
//! | non-admin with group G  | ungrouped, plus groups associated with G   |
//! | non-admin without group | ungrouped only                             |
//!
//! In-memory stores evaluate [`VisibilityScope::permits`] per row; SQL
//! stores push the predicate from [`ScopeEnforcer`] down to the query.
//!
//! ## Example
//!
//! ```
//! use docgate_rbac::{ScopeEnforcer, VisibilityScope};
//! use docgate_types::{Role, UserGroupId};
//!
//! let scope = VisibilityScope::for_principal(Role::Viewer, None);
//! let clause = ScopeEnforcer::new(scope).without_audit().generate_where_clause().unwrap();
//! assert_eq!(clause, "document_group_id IS NULL");
//! ```

pub mod enforcement;
pub mod scope;

pub use enforcement::{Result, ScopeEnforcer, ScopeError};
pub use scope::VisibilityScope;
