//! Policy definitions.
//!
//! Policies consist of prioritised rules, each with conditions that must all
//! match for the rule to apply. Rules are evaluated by priority (highest
//! first, ties in declaration order), and the first matching rule determines
//! the outcome.

use std::collections::HashSet;
use std::path::Path;

use docgate_types::{Action, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version string of [`AbacPolicy::documents_policy`].
pub const DOCUMENTS_POLICY_VERSION: &str = "documents-v1";

// ============================================================================
// Effect
// ============================================================================

/// The effect of a policy rule: allow or deny access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Grant access.
    Allow,
    /// Deny access.
    Deny,
}

impl Default for Effect {
    /// Defaults to `Deny`.
    fn default() -> Self {
        Self::Deny
    }
}

// ============================================================================
// Condition
// ============================================================================

/// A condition that must be satisfied for a rule to match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    // -- Principal conditions --
    /// Principal's role must equal the specified role.
    RoleEquals(Role),
    /// Principal's role must be one of the listed roles.
    RoleIn(Vec<Role>),

    // -- Action / resource conditions --
    /// Action must be one of the listed actions.
    ActionIn(Vec<Action>),
    /// Principal must own the target document. Never true for the collection.
    IsOwner,

    // -- Context conditions --
    /// Group scoping granted access to the resource.
    HasGroupAccess,
    /// Request originated from a private or loopback address.
    PrivateNetwork,
    /// Request originated from a domestic address range.
    DomesticNetwork,

    // -- Logical combinators --
    /// All sub-conditions must be true.
    And(Vec<Condition>),
    /// At least one sub-condition must be true.
    Or(Vec<Condition>),
    /// The sub-condition must be false.
    Not(Box<Condition>),
}

impl Condition {
    /// Shorthand for `Condition::Not(Box::new(condition))`.
    pub fn not(condition: Condition) -> Self {
        Self::Not(Box::new(condition))
    }
}

// ============================================================================
// Rule
// ============================================================================

/// A single access control rule within a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Name reported in decisions and logs. Unique within a policy.
    pub name: String,
    /// The effect when this rule matches.
    pub effect: Effect,
    /// All conditions must be true for this rule to match.
    pub conditions: Vec<Condition>,
    /// Evaluation priority. Higher values are evaluated first.
    pub priority: u32,
}

impl Rule {
    pub fn new(name: impl Into<String>, effect: Effect, priority: u32) -> Self {
        Self {
            name: name.into(),
            effect,
            conditions: Vec::new(),
            priority,
        }
    }

    /// Adds a condition to the rule (builder pattern).
    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }
}

// ============================================================================
// Policy errors
// ============================================================================

/// Reasons a policy is rejected.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy version must not be empty")]
    EmptyVersion,

    #[error("rule #{index} has an empty name")]
    EmptyRuleName { index: usize },

    #[error("duplicate rule name: {0}")]
    DuplicateRuleName(String),

    #[error("rule {rule} contains an empty {combinator} condition")]
    EmptyCondition {
        rule: String,
        combinator: &'static str,
    },

    #[error("failed to read policy file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse policy: {0}")]
    Parse(#[from] serde_json::Error),
}

// ============================================================================
// AbacPolicy
// ============================================================================

/// A versioned attribute-based access control policy.
///
/// When no rule matches, `default_effect` is applied (defaults to `Deny`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbacPolicy {
    /// Identifies the rule set in decisions and logs.
    pub version: String,
    /// The rules in this policy (evaluated in priority order).
    pub rules: Vec<Rule>,
    /// Effect applied when no rule matches.
    #[serde(default)]
    pub default_effect: Effect,
}

impl AbacPolicy {
    /// Creates an empty policy with the given version and default effect.
    pub fn new(version: impl Into<String>, default_effect: Effect) -> Self {
        Self {
            version: version.into(),
            rules: Vec::new(),
            default_effect,
        }
    }

    /// Adds a rule to the policy (builder pattern).
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Returns the standard document gateway policy.
    ///
    /// Rules:
    /// 1. `deny-foreign-public`: deny requests that are neither private nor
    ///    domestic (only when `geo_restriction` is set)
    /// 2. `deny-without-group-access`: deny non-admins without group access
    /// 3. `admin-full-access`: admins may do anything
    /// 4. `owner-manage-own`: owners may read, update and delete their documents
    /// 5. `editor-read-write`: editors may list, read, create and update
    /// 6. `viewer-read-only`: viewers may list and read
    pub fn documents_policy(geo_restriction: bool) -> Self {
        let mut policy = Self::new(DOCUMENTS_POLICY_VERSION, Effect::Deny);

        if geo_restriction {
            policy = policy.with_rule(
                Rule::new("deny-foreign-public", Effect::Deny, 100)
                    .when(Condition::not(Condition::PrivateNetwork))
                    .when(Condition::not(Condition::DomesticNetwork)),
            );
        }

        policy
            .with_rule(
                Rule::new("deny-without-group-access", Effect::Deny, 90)
                    .when(Condition::not(Condition::RoleEquals(Role::Admin)))
                    .when(Condition::not(Condition::HasGroupAccess)),
            )
            .with_rule(
                Rule::new("admin-full-access", Effect::Allow, 50)
                    .when(Condition::RoleEquals(Role::Admin)),
            )
            .with_rule(
                Rule::new("owner-manage-own", Effect::Allow, 40)
                    .when(Condition::IsOwner)
                    .when(Condition::ActionIn(vec![
                        Action::GetDocument,
                        Action::UpdateDocument,
                        Action::DeleteDocument,
                    ])),
            )
            .with_rule(
                Rule::new("editor-read-write", Effect::Allow, 30)
                    .when(Condition::RoleEquals(Role::Editor))
                    .when(Condition::ActionIn(vec![
                        Action::ListDocuments,
                        Action::GetDocument,
                        Action::CreateDocument,
                        Action::UpdateDocument,
                    ])),
            )
            .with_rule(
                Rule::new("viewer-read-only", Effect::Allow, 20)
                    .when(Condition::RoleEquals(Role::Viewer))
                    .when(Condition::ActionIn(vec![
                        Action::ListDocuments,
                        Action::GetDocument,
                    ])),
            )
    }

    /// Parses and validates a policy from JSON.
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Reads, parses and validates a policy file.
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let json = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Checks structural well-formedness.
    ///
    /// A valid policy has a non-empty version, non-empty unique rule names
    /// and no empty `And`, `Or`, `RoleIn` or `ActionIn` conditions.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.version.trim().is_empty() {
            return Err(PolicyError::EmptyVersion);
        }

        let mut seen = HashSet::new();
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.name.trim().is_empty() {
                return Err(PolicyError::EmptyRuleName { index });
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(PolicyError::DuplicateRuleName(rule.name.clone()));
            }
            for condition in &rule.conditions {
                validate_condition(&rule.name, condition)?;
            }
        }

        Ok(())
    }
}

fn validate_condition(rule: &str, condition: &Condition) -> Result<(), PolicyError> {
    let empty = |combinator: &'static str| PolicyError::EmptyCondition {
        rule: rule.to_string(),
        combinator,
    };

    match condition {
        Condition::RoleIn(roles) if roles.is_empty() => Err(empty("RoleIn")),
        Condition::ActionIn(actions) if actions.is_empty() => Err(empty("ActionIn")),
        Condition::And(sub) if sub.is_empty() => Err(empty("And")),
        Condition::Or(sub) if sub.is_empty() => Err(empty("Or")),
        Condition::And(sub) | Condition::Or(sub) => sub
            .iter()
            .try_for_each(|c| validate_condition(rule, c)),
        Condition::Not(inner) => validate_condition(rule, inner),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_policy_is_valid() {
        AbacPolicy::documents_policy(true).validate().unwrap();
        AbacPolicy::documents_policy(false).validate().unwrap();
    }

    #[test]
    fn test_geo_restriction_toggles_rule() {
        let names = |p: &AbacPolicy| p.rules.iter().map(|r| r.name.clone()).collect::<Vec<_>>();

        let strict = AbacPolicy::documents_policy(true);
        assert!(names(&strict).contains(&"deny-foreign-public".to_string()));
        assert_eq!(strict.rules.len(), 6);

        let relaxed = AbacPolicy::documents_policy(false);
        assert!(!names(&relaxed).contains(&"deny-foreign-public".to_string()));
        assert_eq!(relaxed.rules.len(), 5);
        assert_eq!(relaxed.version, DOCUMENTS_POLICY_VERSION);
    }

    #[test]
    fn test_validate_rejects_empty_version() {
        let policy = AbacPolicy::new(" ", Effect::Deny);
        assert!(matches!(policy.validate(), Err(PolicyError::EmptyVersion)));
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let policy = AbacPolicy::new("v1", Effect::Deny)
            .with_rule(Rule::new("a", Effect::Allow, 1))
            .with_rule(Rule::new("a", Effect::Deny, 2));
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::DuplicateRuleName(name)) if name == "a"
        ));
    }

    #[test]
    fn test_validate_rejects_unnamed_rule() {
        let policy = AbacPolicy::new("v1", Effect::Deny).with_rule(Rule::new("", Effect::Allow, 1));
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::EmptyRuleName { index: 0 })
        ));
    }

    #[test]
    fn test_validate_rejects_nested_empty_combinator() {
        let policy = AbacPolicy::new("v1", Effect::Deny).with_rule(
            Rule::new("nested", Effect::Allow, 1)
                .when(Condition::not(Condition::Or(vec![Condition::And(vec![])]))),
        );
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::EmptyCondition { combinator: "And", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_sets() {
        let roles = AbacPolicy::new("v1", Effect::Deny)
            .with_rule(Rule::new("r", Effect::Allow, 1).when(Condition::RoleIn(vec![])));
        assert!(matches!(
            roles.validate(),
            Err(PolicyError::EmptyCondition { combinator: "RoleIn", .. })
        ));

        let actions = AbacPolicy::new("v1", Effect::Deny)
            .with_rule(Rule::new("r", Effect::Allow, 1).when(Condition::ActionIn(vec![])));
        assert!(matches!(
            actions.validate(),
            Err(PolicyError::EmptyCondition { combinator: "ActionIn", .. })
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let policy = AbacPolicy::documents_policy(true);
        let json = serde_json::to_string_pretty(&policy).unwrap();
        let parsed = AbacPolicy::from_json(&json).unwrap();
        assert_eq!(parsed, policy);
    }

    #[test]
    fn test_json_default_effect_is_deny() {
        let json = r#"{
            "version": "custom-1",
            "rules": [
                {
                    "name": "viewers",
                    "effect": "Allow",
                    "priority": 1,
                    "conditions": [{ "RoleIn": ["viewer", "editor"] }, "PrivateNetwork"]
                }
            ]
        }"#;
        let policy = AbacPolicy::from_json(json).unwrap();
        assert_eq!(policy.default_effect, Effect::Deny);
        assert_eq!(
            policy.rules[0].conditions,
            vec![
                Condition::RoleIn(vec![Role::Viewer, Role::Editor]),
                Condition::PrivateNetwork,
            ]
        );
    }

    #[test]
    fn test_json_invalid_policy_rejected() {
        let json = r#"{ "version": "", "rules": [] }"#;
        assert!(matches!(
            AbacPolicy::from_json(json),
            Err(PolicyError::EmptyVersion)
        ));
        assert!(matches!(
            AbacPolicy::from_json("not json"),
            Err(PolicyError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        let policy = AbacPolicy::documents_policy(false);
        std::fs::write(&path, serde_json::to_string(&policy).unwrap()).unwrap();

        assert_eq!(AbacPolicy::load(&path).unwrap(), policy);
        assert!(matches!(
            AbacPolicy::load(&dir.path().join("missing.json")),
            Err(PolicyError::Io { .. })
        ));
    }
}
