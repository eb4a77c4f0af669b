//! WASM bindings for callback verification.

use wasm_bindgen::prelude::*;

use crate::{CallbackLimits, CallbackParams, Result, SharedSecret};

fn parse_query(query: &str) -> Result<CallbackParams> {
    CallbackParams::from_query_bounded(query, &CallbackLimits::default())
}

/// Verify a raw Telegram callback query string against a bot token.
///
/// Malformed queries (including repeated keys) and queries over the default
/// [`CallbackLimits`] verify as `false`.
#[wasm_bindgen]
pub fn verify_telegram_query(query: &str, token: &str) -> bool {
    parse_query(query)
        .map(|params| crate::verify_callback(&params, &SharedSecret::from(token)))
        .unwrap_or(false)
}

/// Compute the `hash` Telegram would attach to a callback query string.
///
/// Returns an empty string when the query cannot be decoded or exceeds the
/// default [`CallbackLimits`].
#[wasm_bindgen]
pub fn sign_telegram_query(query: &str, token: &str) -> String {
    parse_query(query)
        .map(|params| crate::sign_callback(&params, &SharedSecret::from(token)))
        .unwrap_or_default()
}

/// Generate HMAC-SHA256 signature and return as hex string.
#[wasm_bindgen]
pub fn hmac_sha256_hex(key: &str, message: &str) -> String {
    crate::hmac_sha256(key.as_bytes(), message.as_bytes())
}

/// Constant-time comparison of two strings.
#[wasm_bindgen]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    crate::constant_time_compare(a.as_bytes(), b.as_bytes())
}
