//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use tglogin_crypto::{CallbackLimits, DEFAULT_MAX_FIELDS, DEFAULT_MAX_FIELD_LEN};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigSchema {
    /// Bot identity
    #[serde(default)]
    pub bot: BotConfig,

    /// Callback size limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Login policy
    #[serde(default)]
    pub login: LoginConfig,

    /// Logging output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Bot identity shown on the login widget.
///
/// The bot token is deliberately absent: it is only read from the
/// environment.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Bot username, e.g. `my_login_bot`
    #[serde(default)]
    pub name: Option<String>,

    /// URL Telegram redirects to after login
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// Bounds applied to callbacks before verification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum number of query fields
    #[serde(default = "default_max_fields")]
    pub max_fields: usize,

    /// Maximum byte length of a key or value
    #[serde(default = "default_max_field_len")]
    pub max_field_len: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_fields: default_max_fields(),
            max_field_len: default_max_field_len(),
        }
    }
}

impl From<&LimitsConfig> for CallbackLimits {
    fn from(config: &LimitsConfig) -> Self {
        CallbackLimits {
            max_fields: config.max_fields,
            max_field_len: config.max_field_len,
        }
    }
}

fn default_max_fields() -> usize {
    DEFAULT_MAX_FIELDS
}

fn default_max_field_len() -> usize {
    DEFAULT_MAX_FIELD_LEN
}

/// Login acceptance policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoginConfig {
    /// Reject callbacks older than this many seconds; 0 disables the check
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            max_age_secs: default_max_age_secs(),
        }
    }
}

fn default_max_age_secs() -> u64 {
    86_400
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human readable
    #[default]
    Compact,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
