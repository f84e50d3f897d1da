//! Parsed upgrade definitions.
//!
//! An [`UpgradeDefinition`] is the ordered transformation procedure for one
//! connection type, loaded from a declarative YAML document. Definitions are
//! immutable after load and cached for the life of the process by the
//! [`DefinitionRegistry`](crate::registry::DefinitionRegistry).

mod loader;

pub use loader::DefinitionLoader;

use crate::config::ConnectionConfiguration;
use serde_json::Value;

/// One property operation within a step. A step is a diff, not a rewrite:
/// properties it does not name are left untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum UpgradeAction {
    /// Replace the value of an existing property; no-op when absent.
    Set { name: String, value: Value },
    /// Insert a property with a default value, replacing it when the name is
    /// already taken.
    Add { name: String, value: Value },
    /// Move a property to a new name; no-op when the source is absent.
    Rename { from: String, to: String },
}

impl UpgradeAction {
    /// Apply this action to a configuration's property set. Actions are
    /// total: they cannot fail, which is what lets a step commit atomically.
    pub fn apply(&self, config: &mut ConnectionConfiguration) {
        match self {
            UpgradeAction::Set { name, value } => {
                config.replace_config(name, value.clone());
            }
            UpgradeAction::Add { name, value } => {
                config.set_config(name, value.clone());
            }
            UpgradeAction::Rename { from, to } => {
                config.rename_config(from, to);
            }
        }
    }
}

/// One version-to-version transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeStep {
    /// Version the configuration is at once this step has been applied.
    pub to_version: u64,
    pub actions: Vec<UpgradeAction>,
}

/// Ordered transformation procedure for one connection type.
///
/// Steps are sorted ascending by target version and target versions are
/// unique; the loader rejects anything else as malformed.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeDefinition {
    steps: Vec<UpgradeStep>,
}

impl UpgradeDefinition {
    /// Build a definition from steps already validated to be strictly
    /// ascending by target version.
    pub(crate) fn new(steps: Vec<UpgradeStep>) -> Self {
        debug_assert!(steps.windows(2).all(|w| w[0].to_version < w[1].to_version));
        Self { steps }
    }

    /// Build a definition programmatically, for embedders that do not load
    /// from YAML. Steps must be non-empty with strictly ascending target
    /// versions, the same shape the loader enforces.
    pub fn from_steps(steps: Vec<UpgradeStep>) -> crate::Result<Self> {
        if steps.is_empty() {
            return Err(crate::error::Error::DefinitionMalformed(
                "definition declares no upgrade steps".to_string(),
            ));
        }
        if steps[0].to_version == 0 {
            return Err(crate::error::Error::DefinitionMalformed(
                "to_version must be >= 1".to_string(),
            ));
        }
        if !steps.windows(2).all(|w| w[0].to_version < w[1].to_version) {
            return Err(crate::error::Error::DefinitionMalformed(
                "steps must have strictly ascending to_version".to_string(),
            ));
        }
        Ok(Self::new(steps))
    }

    pub fn steps(&self) -> &[UpgradeStep] {
        &self.steps
    }

    /// Highest target version this definition can reach.
    pub fn max_version(&self) -> u64 {
        self.steps.last().map(|s| s.to_version).unwrap_or(0)
    }

    /// The subsequence of steps with `from < to_version <= to`, in order.
    pub fn steps_between(&self, from: u64, to: u64) -> impl Iterator<Item = &UpgradeStep> {
        self.steps
            .iter()
            .filter(move |s| s.to_version > from && s.to_version <= to)
    }

    /// Whether a step targets exactly `version`.
    pub fn reaches(&self, version: u64) -> bool {
        self.steps.iter().any(|s| s.to_version == version)
    }
}
