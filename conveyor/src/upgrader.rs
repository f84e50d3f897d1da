//! The public entry point of the upgrade engine.

use crate::config::ConnectionConfiguration;
use crate::descriptor::{ConnectionCatalog, TypeDescriptor};
use crate::error::Error;
use crate::executor::StepExecutor;
use crate::issue::{Issue, IssueCode};
use crate::registry::DefinitionRegistry;
use std::cmp::Ordering;
use std::sync::Arc;

/// Coordinates version resolution, definition loading, and step execution.
///
/// Both entry points share all downstream logic; they differ only in how the
/// [`TypeDescriptor`] is obtained. Neither ever panics or returns an error
/// for a recoverable condition: every failure mode is appended to the
/// caller-owned `issues` list, and a failed call leaves the configuration
/// untouched.
pub struct ConfigurationUpgrader {
    registry: Arc<DefinitionRegistry>,
}

impl ConfigurationUpgrader {
    pub fn new() -> Self {
        Self::with_registry(Arc::new(DefinitionRegistry::new()))
    }

    /// Share a registry across upgraders so definitions parse once per
    /// process even when several validation subsystems exist.
    pub fn with_registry(registry: Arc<DefinitionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<DefinitionRegistry> {
        &self.registry
    }

    /// Upgrade using a catalog lookup keyed by the configuration's type.
    pub fn upgrade_with_catalog(
        &self,
        catalog: &dyn ConnectionCatalog,
        config: &mut ConnectionConfiguration,
        issues: &mut Vec<Issue>,
    ) {
        match catalog.connection(&config.type_name) {
            Some(descriptor) => self.upgrade_with_descriptor(&descriptor, config, None, issues),
            None => {
                tracing::warn!(type_name = %config.type_name, "connection type not in catalog");
                issues.push(issue_for(
                    Error::UnknownType(config.type_name.clone()),
                    config,
                    None,
                ));
            }
        }
    }

    /// Upgrade using a descriptor the caller already holds. `instance` is an
    /// optional caller-given identifier carried into any reported issue.
    pub fn upgrade_with_descriptor(
        &self,
        descriptor: &TypeDescriptor,
        config: &mut ConnectionConfiguration,
        instance: Option<&str>,
        issues: &mut Vec<Issue>,
    ) {
        let supported = descriptor.version();
        match config.version.cmp(&supported) {
            Ordering::Equal => {
                tracing::debug!(type_name = %config.type_name, version = config.version, "configuration is current");
            }
            Ordering::Greater => {
                issues.push(issue_for(
                    Error::VersionExceedsSupported {
                        type_name: config.type_name.clone(),
                        actual: config.version,
                        supported,
                    },
                    config,
                    instance,
                ));
            }
            Ordering::Less => {
                if let Err(e) = self.run_upgrade(descriptor, config, supported) {
                    issues.push(issue_for(e, config, instance));
                } else {
                    tracing::info!(
                        type_name = %config.type_name,
                        version = config.version,
                        "configuration upgraded"
                    );
                }
            }
        }
    }

    fn run_upgrade(
        &self,
        descriptor: &TypeDescriptor,
        config: &mut ConnectionConfiguration,
        to_version: u64,
    ) -> crate::Result<()> {
        let path = descriptor.upgrader_path().ok_or_else(|| {
            Error::DefinitionNotFound(format!(
                "type '{}' declares no upgrade definition",
                config.type_name
            ))
        })?;
        let definition = self.registry.resolve(path)?;
        StepExecutor::apply(config, &definition, to_version)
    }
}

impl Default for ConfigurationUpgrader {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize an internal error into the issue vocabulary. This is the single
/// point where loader/registry/executor signaling becomes a diagnostic.
fn issue_for(error: Error, config: &ConnectionConfiguration, instance: Option<&str>) -> Issue {
    let code = match &error {
        Error::DefinitionNotFound(_) | Error::Io(_) => IssueCode::DefinitionNotFound,
        Error::UnknownType(_) => IssueCode::UnknownType,
        Error::VersionExceedsSupported { .. } => IssueCode::VersionExceedsSupported,
        _ => IssueCode::DefinitionMalformed,
    };
    Issue::new(code, &config.type_name, instance, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    struct FakeCatalog {
        type_name: &'static str,
        descriptor: TypeDescriptor,
    }

    impl ConnectionCatalog for FakeCatalog {
        fn connection(&self, type_name: &str) -> Option<TypeDescriptor> {
            (type_name == self.type_name).then(|| self.descriptor.clone())
        }
    }

    #[test]
    fn test_catalog_miss_reports_unknown_type() {
        let catalog = FakeCatalog {
            type_name: "jdbc",
            descriptor: TypeDescriptor::without_upgrader(1),
        };
        let upgrader = ConfigurationUpgrader::new();
        let mut config = ConnectionConfiguration::new("kafka", 1, vec![]);
        let mut issues = Vec::new();
        upgrader.upgrade_with_catalog(&catalog, &mut config, &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].error_code(), "UPGRADER_004");
        assert_eq!(config.version, 1);
    }

    #[test]
    fn test_descriptor_without_path_reports_not_found() {
        let upgrader = ConfigurationUpgrader::new();
        let descriptor = TypeDescriptor::without_upgrader(2);
        let mut config = ConnectionConfiguration::new("jdbc", 1, vec![]);
        let mut issues = Vec::new();
        upgrader.upgrade_with_descriptor(&descriptor, &mut config, Some("conn-1"), &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].error_code(), "UPGRADER_002");
        assert_eq!(issues[0].instance.as_deref(), Some("conn-1"));
        assert_eq!(config.version, 1);
    }

    #[test]
    fn test_issues_list_is_appended_not_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.yaml");
        fs::write(&path, "upgrades:\n  - to_version: 2\n").unwrap();

        let upgrader = ConfigurationUpgrader::new();
        let descriptor = TypeDescriptor::new(2, &path);
        let mut config = ConnectionConfiguration::new("jdbc", 1, vec![]);
        let mut issues = vec![Issue::new(
            IssueCode::UnknownType,
            "earlier",
            None,
            "pre-existing",
        )];
        upgrader.upgrade_with_descriptor(&descriptor, &mut config, None, &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].type_name, "earlier");
        assert_eq!(config.version, 2);
    }

    #[test]
    fn test_failed_upgrade_leaves_configuration_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("short.yaml");
        // Definition only reaches 2 while the descriptor declares 3.
        fs::write(&path, "upgrades:\n  - to_version: 2\n").unwrap();

        let upgrader = ConfigurationUpgrader::new();
        let descriptor = TypeDescriptor::new(3, &path);
        let mut config =
            ConnectionConfiguration::new("jdbc", 1, vec![Config::new("p", json!("v"))]);
        let mut issues = Vec::new();
        upgrader.upgrade_with_descriptor(&descriptor, &mut config, None, &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].error_code(), "UPGRADER_003");
        assert_eq!(config.version, 1);
        assert_eq!(config.config("p").unwrap().value, json!("v"));
    }
}
