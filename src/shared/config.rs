use crate::shared::error::ConfigError;
use crate::shared::traits::Validatable;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/bmx_agent.yml";
pub const DEFAULT_ENDPOINT: &str = "https://platform-api.newrelic.com/platform/v1/metrics";

fn default_poll() -> u64 {
    60
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_port() -> u16 {
    80
}

fn default_timeout() -> u64 {
    5
}

/// Contents of the agent's YAML settings file.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub newrelic: ReporterSettings,
    pub agent: RunConfig,
}

/// Where and how often metrics are delivered.
#[derive(Debug, Clone, Deserialize)]
pub struct ReporterSettings {
    #[serde(default)]
    pub license_key: Option<String>,
    /// Seconds between poll cycles.
    #[serde(default = "default_poll")]
    pub poll: u64,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for ReporterSettings {
    fn default() -> Self {
        Self {
            license_key: None,
            poll: default_poll(),
            endpoint: default_endpoint(),
        }
    }
}

impl ReporterSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll)
    }
}

/// Per-host settings read by the poll cycle.
#[derive(Clone, Deserialize)]
pub struct RunConfig {
    pub hostname: String,
    #[serde(default = "default_port")]
    pub hostport: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub testrun: bool,
    #[serde(default)]
    pub fixture: Option<PathBuf>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("hostname", &self.hostname)
            .field("hostport", &self.hostport)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("agent_name", &self.agent_name)
            .field("debug", &self.debug)
            .field("testrun", &self.testrun)
            .field("fixture", &self.fixture)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RunConfig {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            hostport: default_port(),
            username: None,
            password: None,
            agent_name: None,
            debug: false,
            testrun: false,
            fixture: None,
            timeout: default_timeout(),
        }
    }

    /// Component label shown by the metrics backend, `host:port` unless named.
    pub fn label(&self) -> String {
        match &self.agent_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("{}:{}", self.hostname, self.hostport),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Validatable for RunConfig {
    fn validate(&self) -> Result<(), String> {
        if self.hostname.trim().is_empty() {
            return Err("hostname cannot be empty".to_string());
        }
        if self.hostport == 0 {
            return Err("hostport cannot be zero".to_string());
        }
        if self.timeout == 0 {
            return Err("timeout cannot be zero".to_string());
        }
        if self.testrun && self.fixture.is_none() {
            return Err("testrun requires a fixture file".to_string());
        }
        Ok(())
    }
}

impl Validatable for Settings {
    fn validate(&self) -> Result<(), String> {
        self.agent.validate()?;
        if self.newrelic.poll == 0 {
            return Err("poll interval cannot be zero".to_string());
        }
        let has_key = self
            .newrelic
            .license_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());
        if !self.agent.debug && !has_key {
            return Err("license_key is required unless debug is enabled".to_string());
        }
        Ok(())
    }
}

impl Settings {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_yaml::from_str(raw)?;
        settings.validate().map_err(ConfigError::Validation)?;
        Ok(settings)
    }
}
