//! # docgate
//!
//! Attribute-based access control gateway in front of a document store.
//!
//! Every operation is decided from four independent signals: caller identity
//! and role, document ownership, group associations and network origin. The
//! decision is deny-by-default and fails closed: lookup failures, engine
//! errors and unmatched requests all deny.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           Gateway                            │
//! │  ┌────────────┐   ┌────────────┐   ┌──────────┐   ┌───────┐ │
//! │  │  Network   │ → │   Group    │ → │ Context  │ → │ ABAC  │ │
//! │  │ Classifier │   │  Access    │   │Assembler │   │Engine │ │
//! │  └────────────┘   └────────────┘   └──────────┘   └───────┘ │
//! │                         │ listing                            │
//! │                         ▼                                    │
//! │                  VisibilityScope ──► DocumentStore::list     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use docgate::{Gateway, MemoryStore, PolicyEngine, RequestContext};
//! use docgate::{DocumentInput, Principal, Role, TransportMetadata};
//!
//! let gateway = Gateway::new(MemoryStore::new(), PolicyEngine::documents(true));
//! let ctx = RequestContext::new(
//!     Principal::new("alice", Role::Editor),
//!     TransportMetadata::new("10.0.0.5:51000"),
//! );
//!
//! let doc = gateway.create_document(&ctx, DocumentInput::new("Notes", "hello")).unwrap();
//! assert_eq!(gateway.get_document(&ctx, &doc.id).unwrap().title, "Notes");
//! ```

mod access;
mod context;
mod error;
mod gateway;
mod health;


pub use access::GroupAccessResolver;
pub use context::ContextAssembler;
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, RequestContext};
pub use health::{HealthResponse, HealthStatus, Readiness};

// Re-export the building blocks
pub use docgate_abac::{
    AbacPolicy, Decision, DecisionEngine, DecisionKind, DecisionRequest, EngineError,
    PolicyEngine, PolicyError,
};
pub use docgate_network::{NetworkClassifier, NetworkContext, RangeTable, TransportMetadata};
pub use docgate_rbac::{ScopeEnforcer, VisibilityScope};
pub use docgate_store::{
    AssociationStore, DocumentStore, MemoryStore, SeedData, StoreError, StoreResult,
};
pub use docgate_types::{
    Action, Document, DocumentGroupId, DocumentId, DocumentInput, ParseRoleError, Principal,
    PrincipalId, Role, UserGroupId,
};
