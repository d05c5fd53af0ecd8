//! Runtime configuration: proxy base URL, allow-list, fetcher limits.

use crate::allowlist::HostAllowList;
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Public base URL the proxy route is served under.
    pub proxy_base_url: String,

    /// Newline-separated host patterns exempted from proxying. Supports
    /// `host.tld` and `*.host.tld`; empty means proxy every external image.
    pub allowed_hosts: String,

    /// Sqlite database holding ticket messages. Relative paths resolve
    /// against the config directory.
    pub database_path: PathBuf,

    /// Fetch limits enforced by the image-serving endpoint, not by this
    /// crate; carried so an operator's config round-trips unchanged.
    pub max_size_mb: u64,
    pub timeout_seconds: u64,
    pub max_duration_seconds: u64,

    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proxy_base_url: "http://localhost:8080".to_string(),
            allowed_hosts: String::new(),
            database_path: PathBuf::from("messages.db"),
            max_size_mb: 5,
            timeout_seconds: 5,
            max_duration_seconds: 10,
            config_path: PathBuf::new(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self, ConfigError> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .ok_or(ConfigError::NoHome)?;
        Self::load_or_init_in(&home.join(".imgrelay"))
    }

    /// Load `config.toml` from `dir`, writing defaults on first run.
    pub fn load_or_init_in(dir: &Path) -> Result<Self, ConfigError> {
        fs::create_dir_all(dir)?;
        let config_path = dir.join("config.toml");

        let mut config = if config_path.exists() {
            toml::from_str::<Self>(&fs::read_to_string(&config_path)?)?
        } else {
            let config = Self::default();
            fs::write(&config_path, toml::to_string_pretty(&config)?)?;
            config
        };

        config.config_path = config_path;
        if config.database_path.is_relative() {
            config.database_path = dir.join(&config.database_path);
        }
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        fs::write(&self.config_path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Parse the configured allow-list.
    pub fn allow_list(&self) -> HostAllowList {
        HostAllowList::parse(&self.allowed_hosts)
    }
}
