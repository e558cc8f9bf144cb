//! Console configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for values that differ per machine (`HELMSMAN_API_URL`). The
//! login password is never read from the config file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "HELMSMAN_API_URL";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote bot REST endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_connect_timeout_ms() -> u64 {
    3_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

/// Polling cadences.
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Status, trades and errors.
    #[serde(default = "default_fast_interval_ms")]
    pub fast_interval_ms: u64,
    /// News.
    #[serde(default = "default_slow_interval_ms")]
    pub slow_interval_ms: u64,
    #[serde(default = "default_news_limit")]
    pub news_limit: usize,
}

const fn default_fast_interval_ms() -> u64 {
    5_000
}

const fn default_slow_interval_ms() -> u64 {
    60_000
}

const fn default_news_limit() -> usize {
    10
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            fast_interval_ms: default_fast_interval_ms(),
            slow_interval_ms: default_slow_interval_ms(),
            news_limit: default_news_limit(),
        }
    }
}

impl PollingConfig {
    #[must_use]
    pub const fn fast_interval(&self) -> Duration {
        Duration::from_millis(self.fast_interval_ms)
    }

    #[must_use]
    pub const fn slow_interval(&self) -> Duration {
        Duration::from_millis(self.slow_interval_ms)
    }
}

/// Session persistence.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Where the token is persisted. Defaults to `~/.helmsman/session.token`.
    #[serde(default)]
    pub token_path: Option<PathBuf>,
    /// Upper bound on the best-effort logout notification.
    #[serde(default = "default_logout_timeout_ms")]
    pub logout_timeout_ms: u64,
}

const fn default_logout_timeout_ms() -> u64 {
    2_000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: None,
            logout_timeout_ms: default_logout_timeout_ms(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn token_path(&self) -> PathBuf {
        self.token_path
            .clone()
            .unwrap_or_else(crate::cli::paths::default_token_file)
    }

    #[must_use]
    pub const fn logout_timeout(&self) -> Duration {
        Duration::from_millis(self.logout_timeout_ms)
    }
}

/// Operator-side defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Tradable symbols used until the bot reports its own set.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
}

fn default_symbols() -> Vec<String> {
    ["dogecoin", "cardano", "stellar", "polygon"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
        }
    }
}

impl ConsoleConfig {
    #[must_use]
    pub fn symbol_set(&self) -> BTreeSet<String> {
        self.symbols
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            let mut config = Self::default();
            config.apply_env();
            config.validate()?;
            Ok(config)
        }
    }

    #[allow(clippy::result_large_err)]
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "api.base_url",
            }
            .into());
        }
        url::Url::parse(&self.api.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "api.base_url",
            reason: e.to_string(),
        })?;
        if self.polling.fast_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.fast_interval_ms",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        if self.polling.slow_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.slow_interval_ms",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        if self.polling.news_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.news_limit",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Install the global subscriber. Logs go to stderr so command output
    /// on stdout stays scriptable. A second call is a no-op.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                let _ = fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .try_init();
            }
            _ => {
                let _ = fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .try_init();
            }
        }
    }
}
