use super::{UpgradeAction, UpgradeDefinition, UpgradeStep};
use crate::error::Error;
use crate::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Loads and validates one declarative upgrade-definition document.
///
/// The document is an ordered list of version-tagged steps:
///
/// ```yaml
/// upgrades:
///   - to_version: 2
///     actions:
///       - set: { name: prop1.subprop1, value: fromUpgrader1 }
///       - add: { name: prop1.subprop2, value: fromUpgrader2 }
///       - rename: { from: old.name, to: new.name }
/// ```
///
/// A missing or unreadable file is reported as
/// [`Error::DefinitionNotFound`]; anything structurally wrong with the
/// content (unparsable YAML, unknown action keys, missing fields, duplicate
/// or out-of-order target versions) as [`Error::DefinitionMalformed`].
pub struct DefinitionLoader;

impl DefinitionLoader {
    pub fn load(path: &Path) -> Result<UpgradeDefinition> {
        if !path.exists() {
            return Err(Error::DefinitionNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path).map_err(|e| {
            Error::DefinitionNotFound(format!("{}: {}", path.display(), e))
        })?;
        let doc: DefinitionDoc = serde_yaml::from_str(&content).map_err(|e| {
            Error::DefinitionMalformed(format!("{}: {}", path.display(), e))
        })?;
        doc.into_definition(path)
    }
}

// -- YAML deserialization types -----------------------------------------------

#[derive(Deserialize)]
struct DefinitionDoc {
    upgrades: Vec<StepDoc>,
}

#[derive(Deserialize)]
struct StepDoc {
    to_version: u64,
    #[serde(default)]
    actions: Vec<serde_yaml::Value>,
}

/// Each action entry in YAML is a single-key map like
/// `set: { name: prop1, value: x }`. We deserialize each entry as a raw YAML
/// value and dispatch on the key.
impl DefinitionDoc {
    fn into_definition(self, path: &Path) -> Result<UpgradeDefinition> {
        if self.upgrades.is_empty() {
            return Err(malformed(path, "document declares no upgrade steps"));
        }

        let mut steps = Vec::with_capacity(self.upgrades.len());
        let mut last_version = 0u64;
        for step in self.upgrades {
            if step.to_version == 0 {
                return Err(malformed(path, "to_version must be >= 1"));
            }
            if step.to_version <= last_version {
                return Err(malformed(
                    path,
                    &format!(
                        "steps must have strictly ascending to_version (saw {} after {})",
                        step.to_version, last_version
                    ),
                ));
            }
            last_version = step.to_version;

            let mut actions = Vec::with_capacity(step.actions.len());
            for entry in step.actions {
                actions.push(parse_action(path, &entry)?);
            }
            steps.push(UpgradeStep {
                to_version: step.to_version,
                actions,
            });
        }

        Ok(UpgradeDefinition::new(steps))
    }
}

fn parse_action(path: &Path, entry: &serde_yaml::Value) -> Result<UpgradeAction> {
    let map = entry
        .as_mapping()
        .ok_or_else(|| malformed(path, "action entry must be a YAML mapping"))?;
    if map.len() != 1 {
        return Err(malformed(path, "each action entry must have exactly one key"));
    }
    let (key, params) = map.iter().next().ok_or_else(|| {
        malformed(path, "each action entry must have exactly one key")
    })?;
    let name = key
        .as_str()
        .ok_or_else(|| malformed(path, "action name must be a string"))?;

    let action = match name {
        "set" => UpgradeAction::Set {
            name: get_string_field(path, params, "name")?,
            value: get_value_field(path, params, "value")?,
        },
        "add" => UpgradeAction::Add {
            name: get_string_field(path, params, "name")?,
            value: get_value_field(path, params, "value")?,
        },
        "rename" => UpgradeAction::Rename {
            from: get_string_field(path, params, "from")?,
            to: get_string_field(path, params, "to")?,
        },
        other => return Err(malformed(path, &format!("unknown action type: {}", other))),
    };
    Ok(action)
}

fn get_string_field(path: &Path, params: &serde_yaml::Value, field: &str) -> Result<String> {
    params
        .get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| malformed(path, &format!("missing or non-string field '{}'", field)))
}

fn get_value_field(path: &Path, params: &serde_yaml::Value, field: &str) -> Result<serde_json::Value> {
    let value = params
        .get(field)
        .ok_or_else(|| malformed(path, &format!("missing field '{}'", field)))?;
    serde_json::to_value(value)
        .map_err(|e| malformed(path, &format!("field '{}' is not representable: {}", field, e)))
}

fn malformed(path: &Path, message: &str) -> Error {
    Error::DefinitionMalformed(format!("{}: {}", path.display(), message))
}
