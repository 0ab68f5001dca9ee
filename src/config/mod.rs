//! Configuration loading and management

mod display;

pub use display::{DisplaySettings, GroupState};

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::filter::JobFilter;

/// Directory holding the config file, relative to a working directory or home
const CONFIG_DIR: &str = ".pushjobs";
const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Initial job filter
    #[serde(default)]
    pub filter: JobFilter,

    /// Display settings
    #[serde(default)]
    pub display: DisplaySettings,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for: .pushjobs/config.toml, then ~/.pushjobs/config.toml
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let local = dir.join(CONFIG_DIR).join(CONFIG_FILE);
        if local.exists() {
            return Self::from_file(&local);
        }

        if let Some(global) = Self::global_config_path().filter(|p| p.exists()) {
            return Self::from_file(&global);
        }

        Ok(Self::default())
    }

    /// `~/.pushjobs/config.toml`
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Serialize back to TOML, as written by `init`-style tooling
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn selection_debounce(&self) -> Duration {
        Duration::from_millis(self.display.selection_debounce_ms)
    }

    /// Groups render expanded when configured so or when counts are
    /// always expanded
    pub fn groups_expanded(&self) -> bool {
        self.display.group_state.is_expanded() || self.display.group_counts_expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.filter, JobFilter::default());
        assert_eq!(config.display.group_state, GroupState::Collapsed);
        assert_eq!(config.selection_debounce(), Duration::from_millis(200));
        assert!(!config.groups_expanded());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[filter]
search = ["mochitest"]

[display]
group_state = "expanded"
runnable_visible = true
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.filter.search, ["mochitest"]);
        assert_eq!(config.filter.tier, [1, 2]);
        assert!(config.display.runnable_visible);
        assert!(config.groups_expanded());
        assert_eq!(config.display.selection_debounce_ms, 200);
    }

    #[test]
    fn test_from_dir_prefers_local_config() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".pushjobs")).unwrap();
        std::fs::write(
            dir.path().join(".pushjobs/config.toml"),
            "[display]\nselection_debounce_ms = 0\n",
        )
        .unwrap();

        let config = Config::from_dir(dir.path()).unwrap();
        assert_eq!(config.selection_debounce(), Duration::ZERO);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[display\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.toml"));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.display.group_state = GroupState::Expanded;
        config.filter.tier = vec![1];

        let text = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
