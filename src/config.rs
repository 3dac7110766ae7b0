//! Configuration loading.
//!
//! Settings come from a TOML file, then `HEADLINES_*` environment
//! variables, then command-line flags, each layer overriding the last.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_URL_ENV: &str = "HEADLINES_API_URL";
pub const LOG_LEVEL_ENV: &str = "HEADLINES_LOG_LEVEL";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub ticker: TickerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TickerConfig {
    #[serde(default = "default_max_headlines")]
    pub max_headlines: usize,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,

    #[serde(default = "default_scroll_interval")]
    pub scroll_interval_ms: u64,

    #[serde(default = "default_scroll_step")]
    pub scroll_step: i32,
}

fn default_max_headlines() -> usize {
    crate::state::DEFAULT_MAX_HEADLINES
}

fn default_refresh_interval() -> u64 {
    5000
}

fn default_scroll_interval() -> u64 {
    16 // ~60 Hz
}

fn default_scroll_step() -> i32 {
    crate::state::DEFAULT_SCROLL_STEP
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            max_headlines: default_max_headlines(),
            refresh_interval_ms: default_refresh_interval(),
            scroll_interval_ms: default_scroll_interval(),
            scroll_step: default_scroll_step(),
        }
    }
}

impl TickerConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Where the TUI writes its log, since it owns the terminal.
    pub fn file_path(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|p| p.join("headlines"))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("headlines.log")
        })
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `explicit` if given, otherwise the first config file found in
    /// the default locations, then applies environment overrides.
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => Self::load_default()?,
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn load_default() -> Result<Self, ConfigError> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("headlines").join("config.toml")),
            Some(PathBuf::from("./headlines.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.ticker.scroll_step <= 0 {
            return Err(ConfigError::Invalid(
                "ticker.scroll_step must be greater than zero".into(),
            ));
        }
        if self.ticker.max_headlines == 0 {
            return Err(ConfigError::Invalid(
                "ticker.max_headlines must be at least 1".into(),
            ));
        }
        if self.ticker.refresh_interval_ms == 0 || self.ticker.scroll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "ticker intervals must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub fn generate_default_config() -> String {
    format!(
        r#"# Multiplayer Headlines configuration
#
# Environment variables override these settings:
# - {api_env}
# - {log_env}

[api]
# Backend serving GET/PUT /headline
base_url = "http://localhost:8080"
request_timeout_secs = 10

[ticker]
# Headlines kept in the ticker, oldest dropped first
max_headlines = 5

# How often to poll for the latest headline (ms)
refresh_interval_ms = 5000

# Scroll animation tick (ms) and columns moved per tick
scroll_interval_ms = 16
scroll_step = 2

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file (defaults to the platform data directory)
# file = "/tmp/headlines.log"
"#,
        api_env = API_URL_ENV,
        log_env = LOG_LEVEL_ENV,
    )
}
