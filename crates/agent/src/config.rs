//! Agent configuration
//!
//! Loaded from `agent.toml` in the asset directory, then overridden by
//! environment variables.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{AgentError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// Pause before the assistant answers.
    #[serde(default = "default_thinking_delay_ms")]
    pub thinking_delay_ms: u64,

    #[serde(default)]
    pub reasoning: ReasoningConfig,
}

fn default_thinking_delay_ms() -> u64 {
    800
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            thinking_delay_ms: default_thinking_delay_ms(),
            reasoning: ReasoningConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReasoningConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_reasoning_url")]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_reasoning_url() -> String {
    reasoning_client::DEFAULT_REASONING_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: default_reasoning_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ReasoningConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl AgentConfig {
    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No agent config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| AgentError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load from the asset directory and apply environment overrides.
    pub fn load_default() -> Result<Self> {
        let mut config = Self::load(&utils::assets::config_path())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults with environment overrides only.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `AGENT_THINKING_DELAY_MS`, `REASONING_SERVICE_URL`,
    /// `REASONING_ENABLED` and `REASONING_TIMEOUT_SECS`. Setting the URL
    /// enables the reasoning service unless `REASONING_ENABLED` says
    /// otherwise.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(delay) = var("AGENT_THINKING_DELAY_MS") {
            self.thinking_delay_ms = parse_env("AGENT_THINKING_DELAY_MS", &delay)?;
        }
        if let Some(url) = var("REASONING_SERVICE_URL").filter(|u| !u.trim().is_empty()) {
            self.reasoning.url = url;
            self.reasoning.enabled = true;
        }
        if let Some(enabled) = var("REASONING_ENABLED") {
            self.reasoning.enabled = parse_env("REASONING_ENABLED", &enabled)?;
        }
        if let Some(timeout) = var("REASONING_TIMEOUT_SECS") {
            self.reasoning.timeout_secs = parse_env("REASONING_TIMEOUT_SECS", &timeout)?;
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AgentError::Config(format!("invalid value for {}: {:?}", key, value)))
}
