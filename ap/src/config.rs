//! Configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Section updater behaviour
    pub tracker: TrackerConfig,

    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load config from `config_path`, else the first default location that exists
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }
        Self::load_first(&Self::default_paths())
    }

    /// Project file first, then the user config directory
    pub fn default_paths() -> Vec<PathBuf> {
        [
            Some(PathBuf::from(".artifactprogress.yml")),
            dirs::config_dir().map(|p| p.join("artifactprogress").join("artifactprogress.yml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// A broken file is skipped with a warning so the next location still applies
    fn load_first(paths: &[PathBuf]) -> Result<Self> {
        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Config::load: skipping"),
            }
        }
        tracing::debug!("Config::load: no config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the JSON record store
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("artifactprogress"),
        }
    }
}

/// Section updater configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Table holding artifact records
    pub table: String,

    /// Fail updates that name an unknown section instead of ignoring them
    #[serde(rename = "strict-slugs")]
    pub strict_slugs: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            table: crate::ARTIFACTS_TABLE.to_string(),
            strict_slugs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tracker.table, "artifacts");
        assert!(!config.tracker.strict_slugs);
        assert!(config.storage.path.ends_with("artifactprogress"));
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
tracker:
  strict-slugs: true
log-level: debug
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.tracker.strict_slugs);
        assert_eq!(config.tracker.table, "artifacts");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ap.yml");
        fs::write(&path, "storage:\n  path: /tmp/ap-store\ntracker:\n  table: docs\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.storage.path, PathBuf::from("/tmp/ap-store"));
        assert_eq!(config.tracker.table, "docs");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_first_skips_broken_and_missing() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.yml");
        let broken = temp.path().join("broken.yml");
        let good = temp.path().join("good.yml");
        fs::write(&broken, "tracker:\n  table: [1, 2]\n").unwrap();
        fs::write(&good, "tracker:\n  table: docs\n").unwrap();

        let config = Config::load_first(&[missing.clone(), broken, good]).unwrap();
        assert_eq!(config.tracker.table, "docs");

        let config = Config::load_first(&[missing]).unwrap();
        assert_eq!(config.tracker.table, "artifacts");
    }

    #[test]
    fn test_default_paths_start_with_project_file() {
        let paths = Config::default_paths();
        assert_eq!(paths[0], PathBuf::from(".artifactprogress.yml"));
    }
}
