use crate::error::{GarajError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "garajhub.yaml";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// TelegramConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl TelegramConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// PacingConfig
// ---------------------------------------------------------------------------

/// Throughput ceiling for broadcasts: pause `delay_ms` after every
/// `batch_size` delivery attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_batch_size() -> usize {
    10
}

fn default_delay_ms() -> u64 {
    1000
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl PacingConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared bearer token for `/api/*`. `None` leaves the API open.
    #[serde(default)]
    pub admin_token: Option<String>,
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            admin_token: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Chat that receives the delivery report of every broadcast.
    #[serde(default)]
    pub operator_chat_id: i64,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_database() -> PathBuf {
    PathBuf::from("garajhub.db")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            operator_chat_id: 0,
            telegram: TelegramConfig::default(),
            pacing: PacingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GarajError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(GarajError::ConfigNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        match self.telegram.bot_token.as_deref() {
            None => warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "telegram.bot_token is not set; every delivery will fail".to_string(),
            }),
            Some(t) if !t.contains(':') => warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "telegram.bot_token does not look like '<id>:<secret>'".to_string(),
            }),
            Some(_) => {}
        }

        if self.operator_chat_id == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "operator_chat_id is 0; delivery reports will not arrive".to_string(),
            });
        }

        if self.pacing.batch_size == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "pacing.batch_size is 0; treated as 1".to_string(),
            });
        }

        if self.telegram.request_timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "telegram.request_timeout_secs must be greater than 0".to_string(),
            });
        }

        warnings
    }
}
