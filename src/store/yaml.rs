use super::LibraryStore;
use crate::error::{Result, VaultError};
use crate::model::Library;
use chrono::Local;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use uuid::Uuid;

/// Production storage: one YAML document per library in a flat root
/// directory. The root is supplied by the host; [`YamlStore::default_root`]
/// gives embedders a sensible per-user location.
pub struct YamlStore {
    root: PathBuf,
}

impl YamlStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Per-user data directory for hosts that don't dictate a root.
    pub fn default_root() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "promptvault", "promptvault")
            .ok_or_else(|| VaultError::Store("Could not determine data dir".to_string()))?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target_file(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.yaml", name.trim()))
    }

    /// Find the backing file for a library, checking `.yaml` then the
    /// `.yml` fallback.
    fn find_library_file(&self, name: &str) -> Option<PathBuf> {
        let name = name.trim();
        for ext in ["yaml", "yml"] {
            let path = self.root.join(format!("{}.{}", name, ext));
            if path.exists() {
                return Some(path);
            }
        }
        None
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }
}

impl LibraryStore for YamlStore {
    fn load(&self, name: &str) -> Result<Option<Library>> {
        let Some(path) = self.find_library_file(name) else {
            return Ok(None);
        };

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Some(Library::new()));
        }
        let library: Library = serde_yaml::from_str(&content)?;
        Ok(Some(library))
    }

    fn save(&mut self, name: &str, library: &Library) -> Result<PathBuf> {
        self.ensure_root()?;

        let target = self
            .find_library_file(name)
            .unwrap_or_else(|| self.target_file(name));
        let content = serde_yaml::to_string(library)?;

        // Atomic write: a crash mid-write must not corrupt the library
        let tmp = self.root.join(format!(".{}-{}.tmp", name.trim(), Uuid::new_v4()));
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &target)?;

        Ok(target)
    }

    fn mtime(&self, name: &str) -> Option<i64> {
        let path = self.find_library_file(name)?;
        let modified = fs::metadata(path).ok()?.modified().ok()?;
        let since_epoch = modified.duration_since(UNIX_EPOCH).ok()?;
        Some(since_epoch.as_millis() as i64)
    }

    fn path(&self, name: &str) -> PathBuf {
        self.find_library_file(name)
            .unwrap_or_else(|| self.target_file(name))
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_library = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            );
            if is_library {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    // tmp artifacts from interrupted writes are hidden files
                    if !stem.starts_with('.') {
                        names.push(stem.to_string());
                    }
                }
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn backup(&mut self, name: &str) -> Result<PathBuf> {
        let source = self
            .find_library_file(name)
            .ok_or_else(|| VaultError::LibraryMissing(name.to_string()))?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let backup = self
            .root
            .join(format!("{}_backup_{}.yaml", name.trim(), stamp));
        fs::copy(&source, &backup)?;
        Ok(backup)
    }
}
