//! Typed Telegram login on top of signature verification.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::params::{CallbackLimits, CallbackParams};
use crate::{verify_callback, CryptoError, Result, SharedSecret};

/// Seconds an `auth_date` may lie in the future before it is refused.
pub const CLOCK_SKEW_SECS: i64 = 60;

/// User data delivered by an authentic login callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramUser {
    /// Telegram user id
    pub id: i64,
    /// First name
    pub first_name: String,
    /// Last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Username, without the leading `@`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Profile photo URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// When Telegram issued the callback
    #[serde(with = "chrono::serde::ts_seconds")]
    pub auth_date: DateTime<Utc>,
}

impl TelegramUser {
    /// Extract user fields from callback parameters.
    ///
    /// Does not check the signature; see [`LoginVerifier::authenticate`].
    pub fn from_params(params: &CallbackParams) -> Result<Self> {
        let id = required(params, "id")?;
        let id = id.parse::<i64>().map_err(|e| CryptoError::InvalidField {
            field: "id",
            reason: e.to_string(),
        })?;

        let auth_date = required(params, "auth_date")?;
        let auth_date = auth_date
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| CryptoError::InvalidField {
                field: "auth_date",
                reason: format!("not a unix timestamp: {auth_date:?}"),
            })?;

        Ok(Self {
            id,
            first_name: required(params, "first_name")?.to_string(),
            last_name: params.get("last_name").map(String::from),
            username: params.get("username").map(String::from),
            photo_url: params.get("photo_url").map(String::from),
            auth_date,
        })
    }

    /// Name for display: first and last name, or `@username` as a fallback
    /// when the first name is blank.
    pub fn display_name(&self) -> String {
        let full = match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        };
        match (&self.username, full.trim().is_empty()) {
            (Some(username), true) => format!("@{username}"),
            _ => full,
        }
    }
}

fn required<'a>(params: &'a CallbackParams, field: &'static str) -> Result<&'a str> {
    params.get(field).ok_or(CryptoError::MissingField(field))
}

/// Authenticates login callbacks for one bot.
#[derive(Debug, Clone)]
pub struct LoginVerifier {
    secret: SharedSecret,
    limits: CallbackLimits,
    max_age: Option<Duration>,
}

impl LoginVerifier {
    /// Create a verifier with default limits and no age restriction.
    pub fn new(secret: SharedSecret) -> Self {
        Self {
            secret,
            limits: CallbackLimits::default(),
            max_age: None,
        }
    }

    /// Set size limits.
    pub fn with_limits(mut self, limits: CallbackLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Refuse callbacks whose `auth_date` is older than `max_age`.
    ///
    /// An `auth_date` more than [`CLOCK_SKEW_SECS`] in the future is refused
    /// with or without a maximum age.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Verify `params` and return the logged-in user.
    ///
    /// Checks, in order: size limits, signature, required fields, and
    /// freshness of `auth_date` relative to `now`.
    pub fn authenticate(&self, params: &CallbackParams, now: DateTime<Utc>) -> Result<TelegramUser> {
        match self.check(params, now) {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "telegram login accepted");
                Ok(user)
            }
            Err(err) => {
                tracing::warn!(reason = err.kind(), fields = params.len(), "telegram login rejected");
                Err(err)
            }
        }
    }

    fn check(&self, params: &CallbackParams, now: DateTime<Utc>) -> Result<TelegramUser> {
        self.limits.check(params)?;
        if !verify_callback(params, &self.secret) {
            return Err(CryptoError::SignatureMismatch);
        }

        let user = TelegramUser::from_params(params)?;

        let age = now.signed_duration_since(user.auth_date);
        let too_old = self.max_age.is_some_and(|max_age| age > max_age);
        if too_old || age < Duration::seconds(-CLOCK_SKEW_SECS) {
            return Err(CryptoError::Expired {
                age_secs: age.num_seconds(),
                max_age_secs: self.max_age.map_or(0, |max_age| max_age.num_seconds()),
            });
        }

        Ok(user)
    }
}
