//! Configuration handling for stowage shells
//!
//! Configuration is stored in `.stowage/config.toml` (project) and
//! `~/.config/stowage/config.toml` (global).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::stats_log::StatisticsLog;
use crate::cli::{Output, OutputFormat};

/// Name of the per-project directory
pub const PROJECT_DIR: &str = ".stowage";

const DEFAULT_STATISTICS_LOG: &str = "statistics.jsonl";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Append `log_statistics` records to the statistics log
    pub log_statistics: bool,

    /// Statistics log location (relative paths are taken from the project root)
    pub statistics_log: Option<PathBuf>,

    /// Extra filename extensions per format name
    pub extensions: BTreeMap<String, Vec<String>>,

    /// Formats that answer "unsupported" for every store type
    pub disabled_formats: Vec<String>,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Prompt prefix of the shell
    pub prefix: String,

    /// Report dispatch decisions on stderr
    pub verbose: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Text,
            prefix: "stowage".to_string(),
            verbose: false,
        }
    }
}

/// Combined configuration (global + project)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let start = std::env::current_dir().ok();
        Self::load_from(Self::global_config_dir().as_deref(), start.as_deref())
    }

    /// Loads the global file from `global_dir` and the project found by
    /// walking up from `start`
    pub fn load_from(global_dir: Option<&Path>, start: Option<&Path>) -> Result<Self> {
        let global = Self::load_global(global_dir)?;
        let project_root = start.and_then(Self::find_project_root_from);

        let project = match &project_root {
            Some(root) => Self::load_project_config(root)?,
            None => ProjectConfig::default(),
        };

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global(Self::global_config_dir().as_deref())?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "stowage", "stowage").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration from `config_dir`, if there is one
    fn load_global(config_dir: Option<&Path>) -> Result<GlobalConfig> {
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(PROJECT_DIR).join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")
    }

    /// Finds the project root by looking for a `.stowage/` directory
    /// in `start` and its parents
    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns true if we're in a project
    pub fn is_in_project(&self) -> bool {
        self.project_root.is_some()
    }

    /// Output helper matching the configured format and verbosity
    pub fn output(&self) -> Output {
        Output::new(self.global.default_format, self.global.verbose)
    }

    /// The statistics log, if statistics logging is enabled
    ///
    /// Without an explicit path the log lives in the project directory;
    /// outside a project logging needs an absolute path.
    pub fn statistics_log(&self) -> Option<StatisticsLog> {
        if !self.project.log_statistics {
            return None;
        }

        let path = match (&self.project.statistics_log, &self.project_root) {
            (Some(path), _) if path.is_absolute() => path.clone(),
            (Some(path), Some(root)) => root.join(path),
            (None, Some(root)) => root.join(PROJECT_DIR).join(DEFAULT_STATISTICS_LOG),
            _ => return None,
        };

        Some(StatisticsLog::new(path))
    }

    /// Saves the project configuration
    pub fn save_project(&self) -> Result<()> {
        let root = self
            .project_root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not in a project: no {} directory found", PROJECT_DIR))?;
        let project_dir = root.join(PROJECT_DIR);

        fs::create_dir_all(&project_dir).with_context(|| {
            format!(
                "Failed to create project directory: {}",
                project_dir.display()
            )
        })?;

        let config_path = project_dir.join("config.toml");
        let content =
            toml::to_string_pretty(&self.project).context("Failed to serialize project config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write project config: {}", config_path.display()))
    }
}
