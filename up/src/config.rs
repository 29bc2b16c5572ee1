//! Configuration for updateprogress

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default progress JSON file
    #[serde(default = "default_progress_path")]
    pub progress_path: PathBuf,

    /// Default document containing the progress markers
    #[serde(default = "default_readme_path")]
    pub readme_path: PathBuf,

    /// Section type used in the marker lines
    #[serde(default = "default_section")]
    pub section: String,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_progress_path() -> PathBuf {
    PathBuf::from(crate::DEFAULT_PROGRESS_FILE)
}

fn default_readme_path() -> PathBuf {
    PathBuf::from(crate::DEFAULT_README_FILE)
}

fn default_section() -> String {
    progresscore::region::DEFAULT_SECTION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            progress_path: default_progress_path(),
            readme_path: default_readme_path(),
            section: default_section(),
            log_level: None,
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load_from_file(config_path)
                .context(format!("Failed to load config from {}", config_path.display()));
        }

        for path in Self::default_paths() {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => warn!("Failed to load config from {}: {}", path.display(), e),
                }
            }
        }

        debug!("Config::load: no config file found, using defaults");
        Ok(Config::default())
    }

    /// Read only the log level, before logging is initialized
    pub fn load_log_level(path: Option<&PathBuf>) -> Option<String> {
        Self::load(path).ok().and_then(|config| config.log_level)
    }

    /// Project-local config first, then the user config directory
    fn default_paths() -> Vec<PathBuf> {
        [
            Some(PathBuf::from(".updateprogress.yml")),
            dirs::config_dir().map(|p| p.join("updateprogress").join("updateprogress.yml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Config::load_from_file: called");
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
