//! YAML configuration.
//!
//! Only `llm.model` is required; every other key has a default.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::LogSettings;
use serde::Deserialize;
use tabmate_engine::{
    FetchSettings, LlmSettings, BROWSER_USER_AGENT, DEFAULT_BASE_URL, DEFAULT_SNIPPET_CHARS,
    DEFAULT_WORKERS,
};

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub logging: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            allowed_origin: "*".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub max_workers: usize,
    pub timeout_secs: u64,
    pub max_redirects: usize,
    pub max_bytes: u64,
    pub snippet_chars: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let settings = FetchSettings::default();
        Self {
            max_workers: DEFAULT_WORKERS,
            timeout_secs: settings.request_timeout.as_secs(),
            max_redirects: settings.redirect_limit,
            max_bytes: settings.max_bytes,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".into()));
        }
        if self.fetch.max_workers == 0 {
            return Err(ConfigError::Invalid("fetch.max_workers must be at least 1".into()));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid("fetch.timeout_secs must be at least 1".into()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::Invalid("llm.timeout_secs must be at least 1".into()));
        }
        self.server.socket_addr()?;
        crate::cors_layer(&self.server.allowed_origin)?;
        Ok(())
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|err| ConfigError::Invalid(format!("server.bind {:?}: {err}", self.bind)))
    }
}

impl LlmConfig {
    /// Client settings with the API key looked up through `lookup_env`.
    pub fn to_settings(&self, lookup_env: impl Fn(&str) -> Option<String>) -> LlmSettings {
        LlmSettings {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: lookup_env(&self.api_key_env).filter(|key| !key.trim().is_empty()),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl FetchConfig {
    pub fn to_settings(&self) -> FetchSettings {
        let timeout = Duration::from_secs(self.timeout_secs);
        FetchSettings {
            user_agent: self.user_agent.clone(),
            connect_timeout: timeout,
            request_timeout: timeout,
            redirect_limit: self.max_redirects,
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        }
    }
}
