//! Type descriptors and the catalog capability.
//!
//! A [`TypeDescriptor`] is the normalized (declared version, definition path)
//! pair for a connection type. Callers either hand one to the coordinator
//! directly, or supply a [`ConnectionCatalog`] the coordinator queries with
//! the configuration's type name; everything downstream only sees the
//! normalized descriptor.

use std::path::{Path, PathBuf};

/// The currently expected schema version for a type, plus where its upgrade
/// definition lives. The path may be absent for types that never declared an
/// upgrader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    version: u64,
    upgrader_path: Option<PathBuf>,
}

impl TypeDescriptor {
    pub fn new(version: u64, upgrader_path: impl Into<PathBuf>) -> Self {
        Self {
            version,
            upgrader_path: Some(upgrader_path.into()),
        }
    }

    pub fn without_upgrader(version: u64) -> Self {
        Self {
            version,
            upgrader_path: None,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn upgrader_path(&self) -> Option<&Path> {
        self.upgrader_path.as_deref()
    }
}

/// Lookup capability mapping a type name to its descriptor.
///
/// Implementations are expected to be cheap and in-memory; the upgrade
/// coordinator queries them once per configuration.
pub trait ConnectionCatalog: Send + Sync {
    fn connection(&self, type_name: &str) -> Option<TypeDescriptor>;
}
