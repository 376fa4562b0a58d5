//! Builds gateway components from loaded configuration.

use anyhow::{Context, Result};
use docgate::{AbacPolicy, Gateway, MemoryStore, NetworkClassifier, PolicyEngine, SeedData};
use docgate_config::{GatewayConfig, NetworkConfig, PolicyConfig, StoreConfig};
use tracing::info;

/// Classifier using the configured domestic table and header trust.
pub fn build_classifier(config: &NetworkConfig) -> Result<NetworkClassifier> {
    let domestic = config
        .domestic_table()
        .context("Invalid network.domestic_ranges")?;
    Ok(NetworkClassifier::new(domestic).with_trust_forwarded_headers(config.trust_forwarded_headers))
}

/// The policy file if one is configured, otherwise the built-in document policy.
pub fn build_engine(config: &PolicyConfig) -> Result<PolicyEngine> {
    let Some(path) = &config.policy_file else {
        info!(geo_restriction = config.geo_restriction, "Using built-in document policy");
        return Ok(PolicyEngine::documents(config.geo_restriction));
    };

    let policy = AbacPolicy::load(path)
        .with_context(|| format!("Failed to load policy from {}", path.display()))?;
    info!(
        path = %path.display(),
        version = %policy.version,
        rules = policy.rules.len(),
        "Loaded policy file"
    );
    PolicyEngine::new(policy).context("Policy failed validation")
}

/// An empty store, or one populated from the seed file.
pub fn build_store(config: &StoreConfig) -> Result<MemoryStore> {
    let Some(path) = &config.seed_file else {
        return Ok(MemoryStore::new());
    };

    let seed = SeedData::load(path)
        .with_context(|| format!("Failed to load seed data from {}", path.display()))?;
    MemoryStore::from_seed(seed).context("Failed to apply seed data")
}

/// Wires store, engine and classifier into a gateway.
pub fn build_gateway(config: &GatewayConfig) -> Result<Gateway<MemoryStore, PolicyEngine>> {
    let classifier = build_classifier(&config.network)?;
    let engine = build_engine(&config.policy)?;
    let store = build_store(&config.store)?;
    Ok(Gateway::new(store, engine).with_classifier(classifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use docgate::DocumentStore;
    use tempfile::TempDir;

    #[test]
    fn defaults_build_the_document_policy() {
        let engine = build_engine(&PolicyConfig::default()).unwrap();
        let names: Vec<_> = engine.rules_in_order().map(|r| r.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"deny-foreign-public"));
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn geo_restriction_can_be_disabled() {
        let config = PolicyConfig {
            geo_restriction: false,
            policy_file: None,
        };
        let engine = build_engine(&config).unwrap();
        assert!(engine.rules_in_order().all(|r| r.name != "deny-foreign-public"));
    }

    #[test]
    fn policy_file_replaces_builtin() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("policy.json");
        fs::write(
            &path,
            r#"{"version": "custom-1", "rules": [
                {"name": "admins", "effect": "Allow", "priority": 1,
                 "conditions": [{"RoleEquals": "admin"}]}
            ]}"#,
        )
        .unwrap();

        let engine = build_engine(&PolicyConfig {
            geo_restriction: true,
            policy_file: Some(path),
        })
        .unwrap();
        assert_eq!(engine.policy().version, "custom-1");
    }

    #[test]
    fn missing_policy_file_is_an_error() {
        let config = PolicyConfig {
            geo_restriction: true,
            policy_file: Some("/nonexistent/policy.json".into()),
        };
        let err = build_engine(&config).unwrap_err();
        assert!(err.to_string().contains("Failed to load policy"));
    }

    #[test]
    fn seed_file_populates_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(
            &path,
            r#"{"documents": [{"id": "d1", "title": "t", "content": "c", "owner_id": "alice",
                "created_at": "2025-01-08T10:00:00Z", "updated_at": "2025-01-08T10:00:00Z"}]}"#,
        )
        .unwrap();

        let store = build_store(&StoreConfig {
            seed_file: Some(path),
        })
        .unwrap();
        assert!(store.fetch(&"d1".into()).unwrap().is_some());
    }

    #[test]
    fn bad_domestic_range_is_reported() {
        let config = NetworkConfig {
            trust_forwarded_headers: true,
            domestic_ranges: vec!["1.2.3.4/40".to_string()],
        };
        assert!(build_classifier(&config).is_err());
    }

    #[test]
    fn default_config_builds_a_gateway() {
        let gateway = build_gateway(&GatewayConfig::default()).unwrap();
        assert!(!gateway.classifier().domestic_table().is_empty());
    }
}
