use super::LibraryStore;
use crate::error::{Result, VaultError};
use crate::model::Library;
use chrono::Local;
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory storage for tests. No persistence.
///
/// Each save bumps a logical version counter that `mtime` reports, so
/// cache-staleness behavior can be tested without touching the clock
/// or the filesystem.
#[derive(Default)]
pub struct MemoryStore {
    libraries: HashMap<String, Library>,
    versions: HashMap<String, i64>,
    clock: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LibraryStore for MemoryStore {
    fn load(&self, name: &str) -> Result<Option<Library>> {
        Ok(self.libraries.get(name).cloned())
    }

    fn save(&mut self, name: &str, library: &Library) -> Result<PathBuf> {
        self.libraries.insert(name.to_string(), library.clone());
        self.clock += 1;
        self.versions.insert(name.to_string(), self.clock);
        Ok(self.path(name))
    }

    fn mtime(&self, name: &str) -> Option<i64> {
        self.versions.get(name).copied()
    }

    fn path(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("mem://{}.yaml", name))
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.libraries.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn backup(&mut self, name: &str) -> Result<PathBuf> {
        let library = self
            .libraries
            .get(name)
            .cloned()
            .ok_or_else(|| VaultError::LibraryMissing(name.to_string()))?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let backup_name = format!("{}_backup_{}", name, stamp);
        let path = self.path(&backup_name);
        self.save(&backup_name, &library)?;
        Ok(path)
    }
}
