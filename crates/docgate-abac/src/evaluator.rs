//! Policy evaluation engine.
//!
//! Evaluates decision requests against a validated policy by checking rules
//! in priority order. The first matching rule wins. If no rule matches, the
//! policy's default effect applies.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::attributes::DecisionRequest;
use crate::policy::{AbacPolicy, Condition, Effect, PolicyError, Rule};

// ============================================================================
// Decision
// ============================================================================

/// How a decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DecisionKind {
    /// A rule with `Allow` matched.
    Allow,
    /// A rule with `Deny` matched.
    ExplicitDeny,
    /// No rule matched and the default effect was applied.
    ImplicitDeny,
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Allow => "allow",
            Self::ExplicitDeny => "explicit-deny",
            Self::ImplicitDeny => "implicit-deny",
        })
    }
}

/// The result of evaluating a decision request against a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Whether access is allowed or denied.
    pub effect: Effect,
    /// The name of the rule that matched, or `None` if the default was applied.
    pub matched_rule: Option<String>,
    /// Human-readable explanation of why this decision was made.
    pub reason: String,
}

impl Decision {
    /// Classifies the decision.
    ///
    /// A default effect of `Allow` with no matching rule still counts as
    /// [`DecisionKind::Allow`].
    pub fn kind(&self) -> DecisionKind {
        match (self.effect, &self.matched_rule) {
            (Effect::Allow, _) => DecisionKind::Allow,
            (Effect::Deny, Some(_)) => DecisionKind::ExplicitDeny,
            (Effect::Deny, None) => DecisionKind::ImplicitDeny,
        }
    }

    /// Collapses the decision to a boolean verdict.
    pub fn is_authorized(&self) -> bool {
        self.kind() == DecisionKind::Allow
    }
}

// ============================================================================
// DecisionEngine
// ============================================================================

/// Failure to produce a decision.
///
/// Callers treat every engine error as a denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("decision engine unavailable: {0}")]
    Unavailable(String),

    #[error("decision engine rejected the request: {0}")]
    Rejected(String),
}

/// A capability that turns a decision request into a verdict.
///
/// Implementations must be deterministic and side-effect free for a given
/// request and rule set.
pub trait DecisionEngine: Send + Sync {
    fn evaluate(&self, request: &DecisionRequest) -> Result<Decision, EngineError>;
}

// ============================================================================
// PolicyEngine
// ============================================================================

/// In-process [`DecisionEngine`] over an [`AbacPolicy`].
///
/// The policy is validated once at construction and the evaluation order is
/// fixed then; an engine never holds an invalid policy.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    policy: AbacPolicy,
    /// Rule indices, highest priority first, ties in declaration order.
    order: Vec<usize>,
}

impl PolicyEngine {
    /// Validates `policy` and builds an engine for it.
    pub fn new(policy: AbacPolicy) -> Result<Self, PolicyError> {
        policy.validate()?;
        let order = evaluation_order(&policy);
        Ok(Self { policy, order })
    }

    /// Builds an engine over the standard document policy.
    pub fn documents(geo_restriction: bool) -> Self {
        let policy = AbacPolicy::documents_policy(geo_restriction);
        let order = evaluation_order(&policy);
        Self { policy, order }
    }

    pub fn policy(&self) -> &AbacPolicy {
        &self.policy
    }

    /// Returns the rules in evaluation order.
    pub fn rules_in_order(&self) -> impl Iterator<Item = &Rule> {
        self.order.iter().map(|&i| &self.policy.rules[i])
    }

    /// Evaluates a request. Always returns a decision.
    pub fn decide(&self, request: &DecisionRequest) -> Decision {
        for rule in self.rules_in_order() {
            let all_conditions_match = rule
                .conditions
                .iter()
                .all(|cond| evaluate_condition(cond, request));

            if all_conditions_match {
                debug!(
                    policy = %self.policy.version,
                    rule = %rule.name,
                    effect = ?rule.effect,
                    "policy rule matched"
                );
                return Decision {
                    effect: rule.effect,
                    matched_rule: Some(rule.name.clone()),
                    reason: format!("Matched rule '{}' (priority {})", rule.name, rule.priority),
                };
            }
        }

        debug!(policy = %self.policy.version, "no policy rule matched");
        Decision {
            effect: self.policy.default_effect,
            matched_rule: None,
            reason: format!(
                "No rule matched; applying default effect: {:?}",
                self.policy.default_effect
            ),
        }
    }
}

impl DecisionEngine for PolicyEngine {
    fn evaluate(&self, request: &DecisionRequest) -> Result<Decision, EngineError> {
        Ok(self.decide(request))
    }
}

/// Rule indices sorted by priority, highest first.
///
/// The sort is stable, so equal priorities keep declaration order.
fn evaluation_order(policy: &AbacPolicy) -> Vec<usize> {
    let mut order: Vec<usize> = (0..policy.rules.len()).collect();
    order.sort_by(|&a, &b| policy.rules[b].priority.cmp(&policy.rules[a].priority));
    order
}

// ============================================================================
// Condition Evaluation
// ============================================================================

/// Recursively evaluates a single condition against the request.
fn evaluate_condition(condition: &Condition, request: &DecisionRequest) -> bool {
    let principal = request.principal();
    let context = request.context();

    match condition {
        // -- Principal conditions --
        Condition::RoleEquals(role) => principal.role == *role,
        Condition::RoleIn(roles) => roles.contains(&principal.role),

        // -- Action / resource conditions --
        Condition::ActionIn(actions) => actions.contains(&request.action()),
        Condition::IsOwner => request.is_owner(),

        // -- Context conditions --
        Condition::HasGroupAccess => context.has_group_access,
        Condition::PrivateNetwork => context.network.is_private,
        Condition::DomesticNetwork => context.network.is_domestic,

        // -- Logical combinators --
        Condition::And(sub) => sub.iter().all(|c| evaluate_condition(c, request)),
        Condition::Or(sub) => sub.iter().any(|c| evaluate_condition(c, request)),
        Condition::Not(sub) => !evaluate_condition(sub, request),
    }
}
