//! Directory-backed connection catalog.

use crate::definition::DefinitionLoader;
use crate::descriptor::{ConnectionCatalog, TypeDescriptor};
use crate::error::Error;
use crate::Result;
use std::collections::HashMap;
use std::path::Path;

/// A [`ConnectionCatalog`] built by scanning a directory of upgrade
/// definitions, one `<type>.yaml` file per connection type. The declared
/// version of a type is the highest target version its definition reaches.
///
/// This is the catalog shape the platform tooling uses; embedders with their
/// own type registries implement [`ConnectionCatalog`] directly instead.
pub struct DirectoryCatalog {
    descriptors: HashMap<String, TypeDescriptor>,
}

impl DirectoryCatalog {
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::DefinitionNotFound(format!(
                "definition directory does not exist: {}",
                dir.display()
            )));
        }

        let mut descriptors = HashMap::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_yaml = path
                .extension()
                .map_or(false, |e| e == "yaml" || e == "yml");
            if !is_yaml {
                continue;
            }
            let Some(type_name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            // Parse eagerly so a broken definition surfaces at startup, not
            // in the middle of a validation pass.
            let definition = DefinitionLoader::load(&path)?;
            tracing::debug!(
                type_name,
                version = definition.max_version(),
                path = %path.display(),
                "registered connection type"
            );
            descriptors.insert(
                type_name.to_string(),
                TypeDescriptor::new(definition.max_version(), path),
            );
        }

        tracing::info!(types = descriptors.len(), dir = %dir.display(), "catalog loaded");
        Ok(Self { descriptors })
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl ConnectionCatalog for DirectoryCatalog {
    fn connection(&self, type_name: &str) -> Option<TypeDescriptor> {
        self.descriptors.get(type_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_scans_yaml_files() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("jdbc.yaml"),
            "upgrades:\n  - to_version: 2\n  - to_version: 3\n",
        )
        .unwrap();
        fs::write(dir.path().join("sftp.yml"), "upgrades:\n  - to_version: 2\n").unwrap();
        fs::write(dir.path().join("README.md"), "ignored").unwrap();

        let catalog = DirectoryCatalog::open(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        let mut types: Vec<&str> = catalog.types().collect();
        types.sort_unstable();
        assert_eq!(types, vec!["jdbc", "sftp"]);

        let jdbc = catalog.connection("jdbc").unwrap();
        assert_eq!(jdbc.version(), 3);
        assert!(jdbc.upgrader_path().is_some());
        assert!(catalog.connection("kafka").is_none());
    }

    #[test]
    fn test_open_rejects_broken_definition() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.yaml"), "upgrades: []\n").unwrap();
        assert!(matches!(
            DirectoryCatalog::open(dir.path()),
            Err(Error::DefinitionMalformed(_))
        ));
    }

    #[test]
    fn test_open_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            DirectoryCatalog::open(&missing),
            Err(Error::DefinitionNotFound(_))
        ));
    }
}
