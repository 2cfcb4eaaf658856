use crate::core::http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::error::{McServerError, Result};
use crate::utils::fs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const HOME_ENV: &str = "MCSERVER_HOME";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub servers_dir: PathBuf,
    pub timeout_secs: u64,
    /// Extra attempts for transient HTTP failures; 0 disables retrying.
    pub retries: u32,
    pub retry_backoff_ms: u64,
    pub user_agent: String,
    /// TOML endpoint table replacing the built-in upstream URLs.
    pub metadata_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let home = get_mcserver_dir().unwrap_or_else(|_| PathBuf::from(".mcserver"));

        Config {
            servers_dir: home.join("servers"),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            retries: 0,
            retry_backoff_ms: 500,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            metadata_file: None,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        let home = get_mcserver_dir()?;

        Ok(Config {
            servers_dir: home.join("servers"),
            ..Config::default()
        })
    }

    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            let config = Self::new()?;
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            McServerError::config_error(format!("{}: {e}", config_path.display()))
        })?;
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::ensure_dir_exists(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(McServerError::config_error(
                "timeout_secs must be greater than zero",
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(McServerError::config_error("user_agent must not be empty"));
        }
        Ok(())
    }

    pub fn get_server_dir(&self, family: &str, version: &str) -> PathBuf {
        self.servers_dir.join(family).join(version)
    }

    pub fn get_server_jar(&self, family: &str, version: &str) -> PathBuf {
        self.get_server_dir(family, version).join("server.jar")
    }
}

fn get_mcserver_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }

    dirs::home_dir()
        .map(|home| home.join(".mcserver"))
        .ok_or(McServerError::HomeDirectoryNotFound)
}

fn get_config_path() -> Result<PathBuf> {
    Ok(get_mcserver_dir()?.join("config.json"))
}
