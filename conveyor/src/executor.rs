//! Ordered application of upgrade steps.

use crate::config::ConnectionConfiguration;
use crate::definition::UpgradeDefinition;
use crate::error::Error;
use crate::Result;

/// Applies the steps of a definition that fall strictly between a
/// configuration's current version and the target version.
///
/// Each step commits at a single resolution granularity: its actions run,
/// then the configuration's version advances to the step's target. Actions
/// themselves are total, so once the first step starts the walk cannot fail;
/// every precondition is checked before anything is mutated. An early abort
/// therefore leaves the configuration either untouched or exactly at the
/// last committed step's version.
pub struct StepExecutor;

impl StepExecutor {
    pub fn apply(
        config: &mut ConnectionConfiguration,
        definition: &UpgradeDefinition,
        to_version: u64,
    ) -> Result<()> {
        let from_version = config.version;
        if from_version >= to_version {
            return Ok(());
        }

        // Gaps inside the range are fine (a step is a diff keyed to its
        // target), but the definition must actually reach the declared
        // version or the configuration would be left stranded below it.
        if !definition.reaches(to_version) {
            return Err(Error::DefinitionMalformed(format!(
                "no step reaches version {} (definition tops out at {})",
                to_version,
                definition.max_version()
            )));
        }

        for step in definition.steps_between(from_version, to_version) {
            for action in &step.actions {
                action.apply(config);
            }
            config.version = step.to_version;
            tracing::debug!(
                type_name = %config.type_name,
                version = step.to_version,
                actions = step.actions.len(),
                "applied upgrade step"
            );
        }

        debug_assert_eq!(config.version, to_version);
        Ok(())
    }
}
