//! Telegram login callback signatures.
//!
//! Telegram signs the login widget callback as follows: every field except
//! `hash` is rendered as `key=value`, the entries are sorted byte-wise and
//! joined with `\n`, and the result is authenticated with HMAC-SHA256 keyed
//! by `SHA256(bot_token)`. The lowercase hex tag travels in `hash`.

use crate::params::{CallbackLimits, CallbackParams, SIGNATURE_FIELD};
use crate::{constant_time_compare, hmac_sha256, SharedSecret};

/// Build the signed message: sorted `key=value` entries joined by `\n`.
///
/// Values are used verbatim, without escaping. The signature field is left
/// out. An otherwise empty parameter set yields the empty string.
pub fn canonical_blob(params: &CallbackParams) -> String {
    let mut entries: Vec<String> = params
        .iter()
        .filter(|(key, _)| *key != SIGNATURE_FIELD)
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    // Sort whole entries; key order alone differs when a key is a prefix of
    // another and the next byte sorts below '='.
    entries.sort_unstable();
    entries.join("\n")
}

/// Compute the signature Telegram would send for `params`.
///
/// Any signature already present in `params` is ignored.
pub fn sign_callback(params: &CallbackParams, secret: &SharedSecret) -> String {
    hmac_sha256(&secret.signing_key(), canonical_blob(params).as_bytes())
}

/// Check that `params` carries a valid signature under `secret`.
///
/// Returns `false` for a missing signature, a tampered field, a wrong
/// secret, or a signature of the wrong length or case. Never panics.
pub fn verify_callback(params: &CallbackParams, secret: &SharedSecret) -> bool {
    let Some(provided) = params.signature() else {
        return false;
    };
    let expected = sign_callback(params, secret);
    constant_time_compare(expected.as_bytes(), provided.as_bytes())
}

/// [`verify_callback`] preceded by a size check; oversized input is
/// rejected without hashing.
pub fn verify_callback_bounded(
    params: &CallbackParams,
    secret: &SharedSecret,
    limits: &CallbackLimits,
) -> bool {
    if let Err(err) = limits.check(params) {
        tracing::debug!(reason = %err, "callback rejected before verification");
        return false;
    }
    verify_callback(params, secret)
}
