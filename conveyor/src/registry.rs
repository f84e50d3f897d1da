//! Process-wide cache of parsed upgrade definitions.

use crate::definition::{DefinitionLoader, UpgradeDefinition};
use crate::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Registry statistics tracking cache hits, misses, and underlying parses.
#[derive(Debug, Default)]
pub struct RegistryStats {
    hits: AtomicU64,
    misses: AtomicU64,
    loads: AtomicU64,
}

impl RegistryStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of times a definition file was actually read and parsed.
    pub fn loads(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }
}

/// A per-path cache slot. The slot's own mutex is what serializes the first
/// load of a path; the outer map lock is only held long enough to find or
/// insert the slot, so loads of unrelated paths never block each other.
type Slot = Arc<Mutex<Option<Arc<UpgradeDefinition>>>>;

/// Cache of parsed upgrade definitions, keyed by definition path.
///
/// Definitions are static for a deployed software version, so entries live
/// for the registry's lifetime and are never invalidated. Each distinct path
/// is parsed at most once (single-flight); load failures are not cached, so
/// a later call retries the read.
pub struct DefinitionRegistry {
    entries: Mutex<HashMap<PathBuf, Slot>>,
    stats: RegistryStats,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            stats: RegistryStats::new(),
        }
    }

    /// Resolve the definition at `path`, loading it on first use.
    pub fn resolve(&self, path: &Path) -> Result<Arc<UpgradeDefinition>> {
        let slot = {
            let mut entries = self.entries.lock();
            Arc::clone(entries.entry(path.to_path_buf()).or_default())
        };

        let mut guard = slot.lock();
        if let Some(definition) = guard.as_ref() {
            self.stats.hit();
            return Ok(Arc::clone(definition));
        }

        self.stats.miss();
        self.stats.load();
        tracing::debug!(path = %path.display(), "loading upgrade definition");
        let definition = Arc::new(DefinitionLoader::load(path)?);
        *guard = Some(Arc::clone(&definition));
        Ok(definition)
    }

    pub fn stats(&self) -> &RegistryStats {
        &self.stats
    }

    /// Number of successfully cached definitions. Slots are cloned out
    /// before being inspected so the map lock is never held while waiting on
    /// a slot with a load in flight.
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = self.entries.lock().values().cloned().collect();
        slots.iter().filter(|slot| slot.lock().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
