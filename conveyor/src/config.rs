//! Connection configuration model.
//!
//! A [`ConnectionConfiguration`] is a named, versioned, ordered bag of
//! properties for one connection or stage instance. Property names are
//! dot-separated hierarchical keys and are unique within a configuration;
//! values are opaque JSON values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One configuration property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub name: String,
    pub value: Value,
}

impl Config {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A versioned property bag for one connection/stage instance.
///
/// The upgrade engine mutates instances in place; callers own the value and
/// must not share it across threads for the duration of an upgrade call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfiguration {
    #[serde(rename = "type")]
    pub type_name: String,
    pub version: u64,
    #[serde(default)]
    pub configs: Vec<Config>,
}

impl ConnectionConfiguration {
    pub fn new(type_name: impl Into<String>, version: u64, configs: Vec<Config>) -> Self {
        Self {
            type_name: type_name.into(),
            version,
            configs,
        }
    }

    /// Look up a property by name.
    pub fn config(&self, name: &str) -> Option<&Config> {
        self.configs.iter().find(|c| c.name == name)
    }

    pub fn has_config(&self, name: &str) -> bool {
        self.config(name).is_some()
    }

    /// Replace the value of an existing property. Returns false when the
    /// property does not exist; the bag is left unchanged in that case.
    pub fn replace_config(&mut self, name: &str, value: Value) -> bool {
        match self.configs.iter_mut().find(|c| c.name == name) {
            Some(config) => {
                config.value = value;
                true
            }
            None => false,
        }
    }

    /// Insert a property or replace it when the name is already taken,
    /// preserving the position of an existing entry. Name uniqueness is
    /// maintained either way.
    pub fn set_config(&mut self, name: &str, value: Value) {
        if !self.replace_config(name, value.clone()) {
            self.configs.push(Config::new(name, value));
        }
    }

    /// Remove a property by name, returning it when it was present.
    pub fn remove_config(&mut self, name: &str) -> Option<Config> {
        let idx = self.configs.iter().position(|c| c.name == name)?;
        Some(self.configs.remove(idx))
    }

    /// Rename a property in place. When `to` already exists it is removed
    /// first so names stay unique. Returns false when `from` is absent.
    pub fn rename_config(&mut self, from: &str, to: &str) -> bool {
        if from == to || !self.has_config(from) {
            return self.has_config(from);
        }
        self.remove_config(to);
        match self.configs.iter_mut().find(|c| c.name == from) {
            Some(config) => {
                config.name = to.to_string();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ConnectionConfiguration {
        ConnectionConfiguration::new(
            "jdbc",
            1,
            vec![
                Config::new("prop1.subprop1", json!("a")),
                Config::new("prop2.subprop1", json!("b")),
            ],
        )
    }

    #[test]
    fn test_replace_existing_keeps_position() {
        let mut config = sample();
        assert!(config.replace_config("prop1.subprop1", json!("x")));
        assert_eq!(config.configs[0].value, json!("x"));
        assert_eq!(config.configs.len(), 2);
    }

    #[test]
    fn test_replace_missing_is_noop() {
        let mut config = sample();
        assert!(!config.replace_config("nope", json!("x")));
        assert_eq!(config, sample());
    }

    #[test]
    fn test_set_appends_new_name() {
        let mut config = sample();
        config.set_config("prop3", json!(42));
        assert_eq!(config.configs.len(), 3);
        assert_eq!(config.configs[2].name, "prop3");
    }

    #[test]
    fn test_rename_moves_value() {
        let mut config = sample();
        assert!(config.rename_config("prop1.subprop1", "prop1.renamed"));
        assert!(config.config("prop1.subprop1").is_none());
        assert_eq!(config.config("prop1.renamed").unwrap().value, json!("a"));
    }

    #[test]
    fn test_rename_over_existing_keeps_names_unique() {
        let mut config = sample();
        assert!(config.rename_config("prop1.subprop1", "prop2.subprop1"));
        assert_eq!(config.configs.len(), 1);
        assert_eq!(config.config("prop2.subprop1").unwrap().value, json!("a"));
    }

    #[test]
    fn test_rename_missing_source_is_noop() {
        let mut config = sample();
        assert!(!config.rename_config("nope", "other"));
        assert_eq!(config, sample());
    }

    #[test]
    fn test_deserializes_type_field() {
        let config: ConnectionConfiguration = serde_json::from_value(json!({
            "type": "sftp",
            "version": 2,
            "configs": [{"name": "host", "value": "example.com"}]
        }))
        .unwrap();
        assert_eq!(config.type_name, "sftp");
        assert_eq!(config.version, 2);
        assert_eq!(config.config("host").unwrap().value, json!("example.com"));
    }
}
