//! Property tests for callback verification.

use proptest::prelude::*;
use tglogin_crypto::{canonical_blob, sign_callback, verify_callback, CallbackParams, SharedSecret};

fn arb_key() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}".prop_filter("signature field", |k| k != "hash")
}

fn arb_fields() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map(arb_key(), "[ -~]{0,24}", 0..8)
        .prop_map(|m| m.into_iter().collect())
}

fn arb_secret() -> impl Strategy<Value = SharedSecret> {
    "[0-9]{6,10}:[A-Za-z0-9_-]{20,35}".prop_map(SharedSecret::new)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Identical inputs always give the same verdict.
    #[test]
    fn prop_verify_deterministic(fields in arb_fields(), secret in arb_secret(), sig in "[0-9a-f]{64}") {
        let mut params: CallbackParams = fields.into_iter().collect();
        params.insert("hash", sig);
        prop_assert_eq!(verify_callback(&params, &secret), verify_callback(&params, &secret));
    }

    /// Signing then verifying succeeds.
    #[test]
    fn prop_signed_verifies(fields in arb_fields(), secret in arb_secret()) {
        let params: CallbackParams = fields.into_iter().collect();
        prop_assert!(verify_callback(&params.signed(&secret), &secret));
    }

    /// Construction order of the fields has no effect.
    #[test]
    fn prop_order_independent(fields in arb_fields(), secret in arb_secret()) {
        let forward: CallbackParams = fields.iter().cloned().collect();
        let reversed: CallbackParams = fields.iter().rev().cloned().collect();

        prop_assert_eq!(canonical_blob(&forward), canonical_blob(&reversed));
        prop_assert_eq!(sign_callback(&forward, &secret), sign_callback(&reversed, &secret));
    }

    /// Changing one character of one value invalidates the signature.
    #[test]
    fn prop_value_tamper_detected(
        fields in arb_fields().prop_filter("need a field", |f| !f.is_empty()),
        secret in arb_secret(),
        pick in any::<prop::sample::Index>(),
    ) {
        let params: CallbackParams = fields.iter().cloned().collect();
        let mut signed = params.signed(&secret);

        let (key, value) = &fields[pick.index(fields.len())];
        signed.insert(key.clone(), tamper(value));

        prop_assert!(!verify_callback(&signed, &secret));
    }

    /// Changing one character of the signature is detected.
    #[test]
    fn prop_signature_tamper_detected(
        fields in arb_fields(),
        secret in arb_secret(),
        pos in 0usize..64,
    ) {
        let params: CallbackParams = fields.into_iter().collect();
        let signature = sign_callback(&params, &secret);

        let mut chars: Vec<char> = signature.chars().collect();
        chars[pos] = if chars[pos] == '0' { '1' } else { '0' };
        let mut signed = params.clone();
        signed.insert("hash", chars.into_iter().collect::<String>());

        prop_assert!(!verify_callback(&signed, &secret));
    }

    /// A different secret never verifies.
    #[test]
    fn prop_wrong_secret_rejected(fields in arb_fields(), a in arb_secret(), b in arb_secret()) {
        prop_assume!(a != b);
        let params: CallbackParams = fields.into_iter().collect();
        prop_assert!(!verify_callback(&params.signed(&a), &b));
    }
}

/// Replace the last character with a different one.
fn tamper(value: &str) -> String {
    let mut out = value.to_string();
    match out.pop() {
        Some('a') => out.push('b'),
        Some(_) => out.push('a'),
        None => out.push('x'),
    }
    out
}
