//! Telegram login callback verification.
//!
//! This crate provides:
//! - The callback signature check used by "Log in with Telegram"
//! - Typed extraction and freshness checks for the logged-in user
//! - HMAC-SHA256 helpers and constant-time comparison
//!
//! # Example
//!
//! ```rust
//! use tglogin_crypto::{verify_callback, CallbackParams, SharedSecret};
//!
//! let secret = SharedSecret::new("mysecret");
//! let params: CallbackParams = "id=42&first_name=Ann\
//!     &hash=9e62f16467e2ecbfc2490a56204f6bd31a2fd6c00c026e85c06c054245fdf74f"
//!     .parse()
//!     .unwrap();
//!
//! assert!(verify_callback(&params, &secret));
//! ```

#![warn(missing_docs)]

mod error;
mod hmac_impl;
mod login;
mod params;
mod secret;
mod telegram;
mod timing;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::{CryptoError, Result};
pub use hmac_impl::{hmac_sha256, hmac_sha256_raw, sha256, verify_signature, DIGEST_LEN};
pub use login::{LoginVerifier, TelegramUser, CLOCK_SKEW_SECS};
pub use params::{
    CallbackLimits, CallbackParams, DEFAULT_MAX_FIELDS, DEFAULT_MAX_FIELD_LEN, SIGNATURE_FIELD,
};
pub use secret::SharedSecret;
pub use telegram::{canonical_blob, sign_callback, verify_callback, verify_callback_bounded};
pub use timing::constant_time_compare;
