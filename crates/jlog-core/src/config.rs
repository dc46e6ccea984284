//! Configuration management for jlog.
//!
//! Loads configuration from ${JLOG_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::graph::DEFAULT_BATCH_SIZE;
use crate::jj::JjLog;

/// Default config template.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for jlog configuration and log files.
    //!
    //! JLOG_HOME resolution order:
    //! 1. JLOG_HOME environment variable (if set)
    //! 2. ~/.config/jlog (default)
    //! 3. ./.jlog when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the jlog home directory.
    pub fn jlog_home() -> PathBuf {
        if let Ok(home) = std::env::var("JLOG_HOME")
            && !home.is_empty()
        {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".jlog"),
            |h| h.join(".config").join("jlog"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        jlog_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn log_dir() -> PathBuf {
        jlog_home().join("logs")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Program used to run `jj log`.
    pub jj_path: String,
    /// Revset shown when none is given on the command line.
    pub revset: Option<String>,
    /// Passed to `jj log --limit`.
    pub limit: Option<usize>,
    /// Rows per streamed batch.
    pub batch_size: usize,
    /// Highlight the graph lane of the selected revision.
    pub highlight_lanes: bool,
    /// Extra arguments appended to `jj log`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jj_path: "jj".to_string(),
            revset: None,
            limit: None,
            batch_size: DEFAULT_BATCH_SIZE,
            highlight_lanes: true,
            extra_args: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        if config.batch_size == 0 {
            config.batch_size = DEFAULT_BATCH_SIZE;
        }
        Ok(config)
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Builds the `jj log` invocation described by this config.
    pub fn jj_log(&self, repository: Option<PathBuf>) -> JjLog {
        JjLog::new(&self.jj_path)
            .repository(repository)
            .revset(self.revset.clone())
            .limit(self.limit)
            .extra_args(self.extra_args.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nonexistent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.jj_path, "jj");
        assert_eq!(config.batch_size, 50);
        assert!(config.highlight_lanes);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "revset = \"trunk()..@\"\nlimit = 200\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.revset.as_deref(), Some("trunk()..@"));
        assert_eq!(config.limit, Some(200));
        assert_eq!(config.jj_path, "jj");
        assert_eq!(config.batch_size, 50);
    }

    #[test]
    fn test_zero_batch_size_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "batch_size = 0\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "batch_size = \"many\"\n").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("jj_path = \"jj\""));
        assert!(contents.contains("# revset ="));
        assert_eq!(Config::load_from(&config_path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_jj_log_uses_config_values() {
        let config = Config {
            jj_path: "/opt/jj".to_string(),
            revset: Some("mine()".to_string()),
            extra_args: vec!["--ignore-working-copy".to_string()],
            ..Config::default()
        };
        let args = config.jj_log(None).args();
        assert!(args.windows(2).any(|w| w == ["-r", "mine()"]));
        assert_eq!(args.last().map(String::as_str), Some("--ignore-working-copy"));
    }
}
