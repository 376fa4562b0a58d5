//! # docgate-store: Document and association storage
//!
//! Defines the storage capabilities the gateway depends on and an in-memory
//! implementation:
//!
//! - [`DocumentStore`]: fetch, scoped list, insert, update, delete
//! - [`AssociationStore`]: document group / user group pairings
//! - [`MemoryStore`]: both traits over `RwLock`-guarded maps, optionally
//!   seeded from JSON ([`SeedData`])
//!
//! Listing takes a [`VisibilityScope`](docgate_rbac::VisibilityScope) so the
//! filter is applied inside the store rather than by the caller.

mod error;
mod memory;
mod seed;
mod traits;

#[cfg(test)]
mod tests;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use seed::{Association, SeedData};
pub use traits::{AssociationStore, DocumentStore};
