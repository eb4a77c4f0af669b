//! Configuration file and environment loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use crate::validation::{validate_bot_name, validate_callback_url, ValidationResult, Validator};
use chrono::Duration;
use std::path::{Path, PathBuf};
use tglogin_crypto::{CallbackLimits, LoginVerifier, SharedSecret};

/// Environment variable holding the bot token
pub const TOKEN_ENV: &str = "TELEGRAM_TOKEN";
/// Environment variable overriding `bot.name`
pub const NAME_ENV: &str = "TELEGRAM_NAME";
/// Environment variable overriding `bot.callback_url`
pub const CALLBACK_URL_ENV: &str = "TELEGRAM_CALLBACK_URL";

/// Effective configuration: file settings, environment overrides and the
/// bot token.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings with overrides applied
    pub schema: ConfigSchema,
    /// File the settings were read from, if any
    pub path: Option<PathBuf>,
    token: Option<SharedSecret>,
}

impl Config {
    /// Load from a file path (or the standard locations) and the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Load using `env` to look up environment variables.
    pub fn load_with_env<F>(path: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let mut schema = match &config_path {
            Some(p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        if let Some(name) = non_empty(NAME_ENV) {
            schema.bot.name = Some(name);
        }
        if let Some(url) = non_empty(CALLBACK_URL_ENV) {
            schema.bot.callback_url = Some(url);
        }

        Ok(Self {
            schema,
            path: config_path,
            token: non_empty(TOKEN_ENV).map(SharedSecret::new),
        })
    }

    /// Replace the bot token.
    #[must_use]
    pub fn with_token(mut self, token: SharedSecret) -> Self {
        self.token = Some(token);
        self
    }

    /// Whether a bot token is available.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The bot token, or a configuration error naming the variable to set.
    pub fn shared_secret(&self) -> Result<SharedSecret> {
        self.token
            .clone()
            .ok_or_else(|| Error::missing_secret(TOKEN_ENV))
    }

    /// Callback size limits.
    pub fn callback_limits(&self) -> CallbackLimits {
        CallbackLimits::from(&self.schema.limits)
    }

    /// Maximum callback age, `None` when disabled.
    pub fn max_age(&self) -> Option<Duration> {
        match self.schema.login.max_age_secs {
            0 => None,
            secs => i64::try_from(secs).ok().and_then(Duration::try_seconds),
        }
    }

    /// Build a verifier from the token, limits and login policy.
    pub fn login_verifier(&self) -> Result<LoginVerifier> {
        let verifier = LoginVerifier::new(self.shared_secret()?).with_limits(self.callback_limits());
        Ok(match self.max_age() {
            Some(max_age) => verifier.with_max_age(max_age),
            None => verifier,
        })
    }

    /// Check settings for consistency.
    pub fn validate(&self) -> ValidationResult {
        let limits = &self.schema.limits;
        let mut result = Validator::new()
            .range("limits.max_fields", limits.max_fields, 1, 1024)
            .range("limits.max_field_len", limits.max_field_len, 1, 64 * 1024)
            .warn_if(
                "bot.token",
                self.token.is_none(),
                &format!("{TOKEN_ENV} is not set; callbacks cannot be verified"),
            )
            .validate();

        if let Some(name) = &self.schema.bot.name {
            result.merge(validate_bot_name(name));
        }
        if let Some(url) = &self.schema.bot.callback_url {
            result.merge(validate_callback_url(url));
        }
        result
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let local = [".tglogin.toml", "tglogin.toml", ".config/tglogin.toml"]
        .into_iter()
        .map(PathBuf::from);
    let user = dirs::config_dir().map(|dir| dir.join("tglogin").join("config.toml"));

    local.chain(user).find(|candidate| candidate.is_file())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let context = format!("While loading {}", path.display());
    let content = std::fs::read_to_string(path).map_err(Error::from).context(context.clone())?;
    toml::from_str(&content).map_err(Error::from).context(context)
}
