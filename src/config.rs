use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Tunables for an archive root, stored in `config.json` alongside the
/// library files. Missing file or missing keys fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaultConfig {
    /// Display columns of prompt text shown in a summary line.
    #[serde(default = "default_preview_width")]
    pub preview_width: usize,

    /// Total column budget for a summary preview including the tag
    /// suffix, and the preview width used by search results.
    #[serde(default = "default_preview_budget")]
    pub preview_budget: usize,

    /// How many tags a summary line may append.
    #[serde(default = "default_tag_preview_limit")]
    pub tag_preview_limit: usize,

    /// Recency window in minutes within which an identical prompt is
    /// considered a duplicate of an existing record.
    #[serde(default = "default_duplicate_window_mins")]
    pub duplicate_window_mins: i64,
}

fn default_preview_width() -> usize {
    60
}

fn default_preview_budget() -> usize {
    80
}

fn default_tag_preview_limit() -> usize {
    2
}

fn default_duplicate_window_mins() -> i64 {
    60
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            preview_width: default_preview_width(),
            preview_budget: default_preview_budget(),
            tag_preview_limit: default_tag_preview_limit(),
            duplicate_window_mins: default_duplicate_window_mins(),
        }
    }
}

impl VaultConfig {
    /// Load config from the given directory, or return defaults if not found.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: VaultConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory.
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }
}
