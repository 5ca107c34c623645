//! Configuration loading, validation, and management for the triage services.
//!
//! Loads configuration from `~/.triage/config.toml` (or the file named by
//! `TRIAGE_CONFIG`) with environment variable overrides. Validates all
//! settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use triage_core::AgentKind;

/// The root configuration structure.
///
/// Maps directly to `~/.triage/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Coordinator service settings
    #[serde(default)]
    pub coordinator: CoordinatorConfig,

    /// Settings shared by every agent service wrapper
    #[serde(default)]
    pub agent_service: AgentServiceConfig,

    /// Registered agents, in the order their replies are reported
    #[serde(default = "default_agents")]
    pub agents: Vec<AgentEndpointConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_coordinator_port")]
    pub port: u16,

    /// Per-agent call timeout when an agent does not set its own
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_coordinator_port() -> u16 {
    8000
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_coordinator_port(),
            default_timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentServiceConfig {
    /// Interface the agent wrappers bind to; ports come from each agent's URL
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for AgentServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
        }
    }
}

/// One registered agent: who it is, where it lives, how long to wait.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentEndpointConfig {
    /// Name the coordinator reports replies under
    pub name: String,

    /// Which agent runs behind this endpoint
    pub kind: AgentKind,

    /// Full URL of the agent's handle endpoint (e.g. `http://localhost:5002/a2a`)
    pub url: String,

    /// Overrides `coordinator.default_timeout_secs` for this agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl AgentEndpointConfig {
    /// Default registration for a kind, on localhost at its default port.
    pub fn for_kind(kind: AgentKind) -> Self {
        Self {
            name: kind.default_name().into(),
            kind,
            url: format!("http://localhost:{}/a2a", kind.default_port()),
            timeout_secs: None,
        }
    }

    /// Effective timeout given the coordinator-wide default.
    pub fn timeout(&self, default_secs: u64) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(default_secs))
    }

    /// Port the agent's service wrapper listens on, derived from `url`.
    pub fn port(&self) -> Option<u16> {
        let after_scheme = self.url.split_once("://").map(|(_, rest)| rest)?;
        let authority = after_scheme.split('/').next()?;
        match authority.rsplit_once(':') {
            Some((_, port)) => port.parse().ok(),
            None if self.url.starts_with("https://") => Some(443),
            None => Some(80),
        }
    }

    /// Base URL of the service (scheme + authority), used for `/health`.
    pub fn base_url(&self) -> String {
        match self.url.split_once("://") {
            Some((scheme, rest)) => {
                let authority = rest.split('/').next().unwrap_or(rest);
                format!("{scheme}://{authority}")
            }
            None => self.url.clone(),
        }
    }
}

fn default_agents() -> Vec<AgentEndpointConfig> {
    AgentKind::ALL
        .iter()
        .map(|kind| AgentEndpointConfig::for_kind(*kind))
        .collect()
}

impl AppConfig {
    /// Load configuration from `TRIAGE_CONFIG` or the default path
    /// (~/.triage/config.toml).
    ///
    /// Environment overrides (highest priority):
    /// - `TRIAGE_COORDINATOR_PORT`
    /// - `TRIAGE_AGENT_TIMEOUT_SECS`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::resolved_path())?;

        if let Ok(port) = std::env::var("TRIAGE_COORDINATOR_PORT") {
            config.coordinator.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "TRIAGE_COORDINATOR_PORT must be a port number, got '{port}'"
                ))
            })?;
        }

        if let Ok(secs) = std::env::var("TRIAGE_AGENT_TIMEOUT_SECS") {
            config.coordinator.default_timeout_secs = secs.parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "TRIAGE_AGENT_TIMEOUT_SECS must be a whole number of seconds, got '{secs}'"
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// The file `load()` reads: `TRIAGE_CONFIG` when set, else `config_path()`.
    pub fn resolved_path() -> PathBuf {
        Self::path_or_default(std::env::var_os("TRIAGE_CONFIG").map(PathBuf::from))
    }

    fn path_or_default(override_path: Option<PathBuf>) -> PathBuf {
        override_path.unwrap_or_else(Self::config_path)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".triage")
    }

    /// Default location of the config file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// First registered agent of the given kind.
    pub fn agent_of_kind(&self, kind: AgentKind) -> Option<&AgentEndpointConfig> {
        self.agents.iter().find(|a| a.kind == kind)
    }

    /// Effective timeout for one agent.
    pub fn agent_timeout(&self, agent: &AgentEndpointConfig) -> Duration {
        agent.timeout(self.coordinator.default_timeout_secs)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agents.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one agent must be registered".into(),
            ));
        }

        if self.coordinator.default_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "coordinator.default_timeout_secs must be > 0".into(),
            ));
        }

        let mut seen = HashSet::new();
        for agent in &self.agents {
            if agent.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "agent names must not be empty".into(),
                ));
            }
            if !seen.insert(agent.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate agent name '{}'",
                    agent.name
                )));
            }
            if !agent.url.starts_with("http://") && !agent.url.starts_with("https://") {
                return Err(ConfigError::ValidationError(format!(
                    "agent '{}' url must start with http:// or https://",
                    agent.name
                )));
            }
            if agent.timeout_secs == Some(0) {
                return Err(ConfigError::ValidationError(format!(
                    "agent '{}' timeout_secs must be > 0",
                    agent.name
                )));
            }
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            coordinator: CoordinatorConfig::default(),
            agent_service: AgentServiceConfig::default(),
            agents: default_agents(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
