//! Configuration management for jira-comments
//!
//! Settings live in `~/.config/jira-comments/config.yaml`. Every field is
//! optional; command-line flags and environment variables take precedence
//! over the file, which takes precedence over the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The name of the package, used for config directory naming
const PKG_NAME: &str = "jira-comments";

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/jira";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Full URL of the Jira proxy route
    pub endpoint: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// How many recently viewed issue keys to remember
    pub recent_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it doesn't exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&contents)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the endpoint (from `--endpoint` or the environment)
    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check that the settings are usable
    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(Error::Config(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }
}

/// Get the configuration directory path
///
/// Returns the path to `~/.config/jira-comments/`, creating it if it doesn't exist.
pub fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("HOME environment variable not set".into()))?;
    let path = PathBuf::from(home).join(".config").join(PKG_NAME);

    ensure_dir_exists(&path)?;
    Ok(path)
}

/// Get the path to the default config file
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Get the path to the recent issues file, stored next to the config file
pub fn get_recent_path(config_path: &Path) -> Result<PathBuf> {
    let dir = match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_dir_exists(&dir)?;
    Ok(dir.join("recent.txt"))
}

fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
