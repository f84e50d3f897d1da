//! The hosting validation pass.
//!
//! Runs the upgrade engine over every connection in a loaded pipeline
//! definition and aggregates all issues so an operator sees every problem at
//! once; one broken connection never stops validation of the rest.

use crate::config::ConnectionConfiguration;
use crate::descriptor::ConnectionCatalog;
use crate::error::Error;
use crate::issue::Issue;
use crate::upgrader::ConfigurationUpgrader;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A loaded pipeline definition: the subset the validation pass needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDefinition {
    pub title: String,
    #[serde(default)]
    pub connections: Vec<ConnectionConfiguration>,
}

impl PipelineDefinition {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::PipelineDefinition {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Validates pipeline definitions, upgrading lagging connection
/// configurations in place as it goes.
pub struct PipelineValidator {
    upgrader: ConfigurationUpgrader,
}

impl PipelineValidator {
    pub fn new() -> Self {
        Self {
            upgrader: ConfigurationUpgrader::new(),
        }
    }

    pub fn with_upgrader(upgrader: ConfigurationUpgrader) -> Self {
        Self { upgrader }
    }

    pub fn upgrader(&self) -> &ConfigurationUpgrader {
        &self.upgrader
    }

    /// Validate every connection in `pipeline` against `catalog`, returning
    /// all issues found across all instances.
    pub fn validate(
        &self,
        catalog: &dyn ConnectionCatalog,
        pipeline: &mut PipelineDefinition,
    ) -> Vec<Issue> {
        let mut issues = Vec::new();
        for connection in &mut pipeline.connections {
            self.upgrader
                .upgrade_with_catalog(catalog, connection, &mut issues);
        }
        tracing::info!(
            pipeline = %pipeline.title,
            connections = pipeline.connections.len(),
            issues = issues.len(),
            "pipeline validated"
        );
        issues
    }
}

impl Default for PipelineValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DirectoryCatalog;
    use crate::config::Config;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn pipeline(connections: Vec<ConnectionConfiguration>) -> PipelineDefinition {
        PipelineDefinition {
            title: "test pipeline".to_string(),
            connections,
        }
    }

    #[test]
    fn test_one_bad_connection_does_not_stop_the_rest() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("jdbc.yaml"),
            r#"
upgrades:
  - to_version: 2
    actions:
      - add: { name: added, value: yes }
"#,
        )
        .unwrap();
        let catalog = DirectoryCatalog::open(dir.path()).unwrap();

        let validator = PipelineValidator::new();
        let mut pipeline = pipeline(vec![
            ConnectionConfiguration::new("unknown-type", 1, vec![]),
            ConnectionConfiguration::new("jdbc", 1, vec![]),
            ConnectionConfiguration::new("jdbc", 3, vec![]),
        ]);

        let issues = validator.validate(&catalog, &mut pipeline);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].error_code(), "UPGRADER_004");
        assert_eq!(issues[1].error_code(), "UPGRADER_001");
        // The healthy connection in the middle was still upgraded.
        assert_eq!(pipeline.connections[1].version, 2);
        assert!(pipeline.connections[1].has_config("added"));
        // The too-new one was left alone.
        assert_eq!(pipeline.connections[2].version, 3);
    }

    #[test]
    fn test_validators_can_share_one_registry() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("jdbc.yaml"), "upgrades:\n  - to_version: 2\n").unwrap();
        let catalog = DirectoryCatalog::open(dir.path()).unwrap();

        let registry = std::sync::Arc::new(crate::registry::DefinitionRegistry::new());
        for _ in 0..3 {
            let upgrader =
                crate::upgrader::ConfigurationUpgrader::with_registry(std::sync::Arc::clone(
                    &registry,
                ));
            let validator = PipelineValidator::with_upgrader(upgrader);
            let mut pipeline =
                pipeline(vec![ConnectionConfiguration::new("jdbc", 1, vec![])]);
            let issues = validator.validate(&catalog, &mut pipeline);
            assert!(issues.is_empty());
            assert_eq!(pipeline.connections[0].version, 2);
            assert_eq!(validator.upgrader().registry().stats().loads(), 1);
        }
    }

    #[test]
    fn test_load_pipeline_definition() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.json");
        fs::write(
            &path,
            json!({
                "title": "orders",
                "connections": [
                    {"type": "jdbc", "version": 1, "configs": [
                        {"name": "jdbc.url", "value": "jdbc:postgresql://db/orders"}
                    ]}
                ]
            })
            .to_string(),
        )
        .unwrap();

        let pipeline = PipelineDefinition::load(&path).unwrap();
        assert_eq!(pipeline.title, "orders");
        assert_eq!(pipeline.connections.len(), 1);
        assert_eq!(pipeline.connections[0].type_name, "jdbc");
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            PipelineDefinition::load(&path),
            Err(Error::PipelineDefinition { .. })
        ));
    }

    #[test]
    fn test_connections_default_to_empty() {
        let pipeline: PipelineDefinition =
            serde_json::from_str(r#"{"title": "empty"}"#).unwrap();
        assert!(pipeline.connections.is_empty());
    }

    #[test]
    fn test_upgraded_connection_roundtrips_through_json() {
        let mut connection = ConnectionConfiguration::new(
            "jdbc",
            2,
            vec![Config::new("jdbc.url", json!("jdbc:postgresql://db"))],
        );
        connection.set_config("added", json!(true));
        let text = serde_json::to_string(&pipeline(vec![connection])).unwrap();
        let parsed: PipelineDefinition = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.connections[0].configs.len(), 2);
    }
}
