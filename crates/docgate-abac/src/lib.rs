//! # docgate-abac: Attribute-Based Access Control
//!
//! Turns a validated [`DecisionRequest`] into an allow/deny [`Decision`]
//! under a deny-by-default model.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  DecisionRequest                             │
//! │  (Principal + Action + Resource + Context)   │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  DecisionEngine (PolicyEngine)               │
//! │  ├─ Evaluate rules by priority               │
//! │  ├─ Match conditions against attributes      │
//! │  └─ Return Allow/Deny decision               │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Decision                                    │
//! │  - Effect (Allow/Deny)                       │
//! │  - Matched rule name                         │
//! │  - Human-readable reason                     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Standard Policy
//!
//! [`AbacPolicy::documents_policy`] (version `documents-v1`) denies foreign
//! public origins and ungranted group access, then grants by role and
//! ownership. Anything else falls through to `Deny`.
//!
//! ## Examples
//!
//! ```
//! use docgate_abac::{
//!     ContextAttributes, DecisionEngine, DecisionRequest, PolicyEngine, PrincipalAttributes,
//!     ResourceAttributes,
//! };
//! use docgate_network::NetworkClassifier;
//! use docgate_types::{Action, Principal, Role};
//!
//! let engine = PolicyEngine::documents(true);
//! let principal = Principal::new("alice", Role::Viewer);
//!
//! let request = DecisionRequest::new(
//!     PrincipalAttributes::from(&principal),
//!     Action::ListDocuments,
//!     ResourceAttributes::Collection,
//!     ContextAttributes {
//!         network: NetworkClassifier::default().classify("10.0.0.7"),
//!         has_group_access: true,
//!     },
//! )
//! .unwrap();
//!
//! let decision = engine.evaluate(&request).unwrap();
//! assert!(decision.is_authorized());
//! assert_eq!(decision.matched_rule.as_deref(), Some("viewer-read-only"));
//! ```

pub mod attributes;
pub mod evaluator;
pub mod policy;


pub use attributes::{
    ContextAttributes, DecisionRequest, PrincipalAttributes, RequestError, ResourceAttributes,
};
pub use evaluator::{Decision, DecisionEngine, DecisionKind, EngineError, PolicyEngine};
pub use policy::{
    AbacPolicy, Condition, DOCUMENTS_POLICY_VERSION, Effect as PolicyEffect, PolicyError, Rule,
};
