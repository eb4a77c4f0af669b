//! The bot token shared between Telegram and the verifying service.

use std::fmt;

use crate::hmac_impl::{sha256, DIGEST_LEN};

/// Bot token used to authenticate login callbacks.
///
/// The value is never printed: `Debug` is redacted and there is no
/// `Display` implementation.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(String);

impl SharedSecret {
    /// Wrap a bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// HMAC key for callback signatures: the raw SHA-256 digest of the token.
    ///
    /// Telegram keys the HMAC with `SHA256(token)`, not with the token itself.
    pub fn signing_key(&self) -> [u8; DIGEST_LEN] {
        sha256(self.0.as_bytes())
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

impl From<String> for SharedSecret {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for SharedSecret {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}
