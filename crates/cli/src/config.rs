//! Configuration management for agentctl
//!
//! Handles loading and saving configuration from ~/.agentctl/config.toml

use std::path::{Path, PathBuf};

use anyhow::Result;
use db::models::Domain;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub url: String,
}

pub fn default_server_url() -> String {
    "http://localhost:3002".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatConfig {
    /// Domain the REPL starts in.
    #[serde(default = "default_domain")]
    pub default_domain: Domain,
}

fn default_domain() -> Domain {
    Domain::Gateway
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_domain: default_domain(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".agentctl")
            .join("config.toml")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get a configuration value by key path (e.g., "server.url")
    pub fn get(&self, key: &str) -> Option<String> {
        match key.split('.').collect::<Vec<_>>().as_slice() {
            ["server", "url"] => Some(self.server.url.clone()),
            ["chat", "default_domain"] => Some(self.chat.default_domain.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key path. Does not save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key.split('.').collect::<Vec<_>>().as_slice() {
            ["server", "url"] => self.server.url = value.to_string(),
            ["chat", "default_domain"] => {
                self.chat.default_domain = value.parse().map_err(anyhow::Error::msg)?
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }
        Ok(())
    }
}
