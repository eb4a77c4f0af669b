//! Callback query parameters and the bounds applied to them.

use std::borrow::Cow;
use std::collections::btree_map::{BTreeMap, Entry};
use std::collections::HashMap;
use std::str::FromStr;

use percent_encoding::percent_decode_str;

use crate::{CryptoError, Result, SharedSecret};

/// Name of the field carrying the callback signature.
pub const SIGNATURE_FIELD: &str = "hash";

/// Field name to value mapping received on a login callback.
///
/// Keys are unique. Iteration follows key order, which is NOT the order the
/// signature is computed over; see [`crate::canonical_blob`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    fields: BTreeMap<String, String>,
}

impl CallbackParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored. Repeated keys are rejected, as is any
    /// escape that does not decode to UTF-8.
    pub fn from_query(query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| -> Result<(String, String)> {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                Ok((decode_component(key)?, decode_component(value)?))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::try_from_pairs(pairs)
    }

    /// Decode a query string, refusing input larger than `limits` allow
    /// before doing any decoding work.
    pub fn from_query_bounded(query: &str, limits: &CallbackLimits) -> Result<Self> {
        if query.len() > limits.max_query_len() {
            return Err(CryptoError::LimitExceeded(format!(
                "query is {} bytes, max {}",
                query.len(),
                limits.max_query_len()
            )));
        }
        let params = Self::from_query(query)?;
        limits.check(&params)?;
        Ok(params)
    }

    /// Build from key/value pairs, rejecting repeated keys.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields = BTreeMap::new();
        for (key, value) in pairs {
            match fields.entry(key.into()) {
                Entry::Occupied(e) => return Err(CryptoError::DuplicateField(e.key().clone())),
                Entry::Vacant(e) => {
                    e.insert(value.into());
                }
            }
        }
        Ok(Self { fields })
    }

    /// Insert a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(key.into(), value.into())
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.fields.remove(key)
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The provided signature, if any.
    pub fn signature(&self) -> Option<&str> {
        self.get(SIGNATURE_FIELD)
    }

    /// Number of fields, signature included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Re-encode as a query string (key order).
    pub fn to_query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Copy of these parameters with the signature field replaced by one
    /// computed under `secret`.
    pub fn signed(&self, secret: &SharedSecret) -> Self {
        let mut signed = self.clone();
        signed.insert(SIGNATURE_FIELD, crate::sign_callback(self, secret));
        signed
    }
}

impl FromStr for CallbackParams {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_query(s)
    }
}

impl From<HashMap<String, String>> for CallbackParams {
    fn from(map: HashMap<String, String>) -> Self {
        Self {
            fields: map.into_iter().collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CallbackParams {
    /// Later duplicates overwrite earlier ones; use
    /// [`CallbackParams::try_from_pairs`] to reject them instead.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Default maximum number of fields in a callback.
pub const DEFAULT_MAX_FIELDS: usize = 32;

/// Default maximum byte length of a single key or value.
pub const DEFAULT_MAX_FIELD_LEN: usize = 1024;

/// Upper bounds on callback size, checked before any hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackLimits {
    /// Maximum number of fields, signature included
    pub max_fields: usize,
    /// Maximum byte length of any key or value
    pub max_field_len: usize,
}

impl Default for CallbackLimits {
    fn default() -> Self {
        Self {
            max_fields: DEFAULT_MAX_FIELDS,
            max_field_len: DEFAULT_MAX_FIELD_LEN,
        }
    }
}

impl CallbackLimits {
    /// Largest raw query string that could decode within these limits.
    ///
    /// Percent-encoding triples a byte, so the bound allows for that plus
    /// the `=` and `&` separators.
    pub fn max_query_len(&self) -> usize {
        self.max_fields
            .saturating_mul(self.max_field_len.saturating_mul(6).saturating_add(2))
    }

    /// Check `params` against these limits.
    pub fn check(&self, params: &CallbackParams) -> Result<()> {
        if params.len() > self.max_fields {
            return Err(CryptoError::LimitExceeded(format!(
                "{} fields, max {}",
                params.len(),
                self.max_fields
            )));
        }
        for (key, value) in params.iter() {
            if key.len() > self.max_field_len || value.len() > self.max_field_len {
                return Err(CryptoError::LimitExceeded(format!(
                    "field {:?} longer than {} bytes",
                    truncate(key, 32),
                    self.max_field_len
                )));
            }
        }
        Ok(())
    }
}

/// Form-decode one key or value: `+` is a space, then percent escapes.
fn decode_component(raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|e| CryptoError::InvalidField {
            field: "query",
            reason: format!("{:?} does not decode to UTF-8: {e}", truncate(raw, 32)),
        })
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_decodes_escapes() {
        let params =
            CallbackParams::from_query("?id=42&first_name=Ann+Marie&photo_url=https%3A%2F%2Ft.me%2Fi.jpg")
                .unwrap();

        assert_eq!(params.len(), 3);
        assert_eq!(params.get("first_name"), Some("Ann Marie"));
        assert_eq!(params.get("photo_url"), Some("https://t.me/i.jpg"));
    }

    #[test]
    fn test_from_query_rejects_duplicates() {
        let err = CallbackParams::from_query("id=1&id=2").unwrap_err();
        assert_eq!(err, CryptoError::DuplicateField("id".to_string()));
    }

    #[test]
    fn test_from_query_rejects_invalid_utf8_escape() {
        assert!(matches!(
            CallbackParams::from_query("first_name=%FF"),
            Err(CryptoError::InvalidField { field: "query", .. })
        ));
        assert!(CallbackParams::from_query("id=1&%C3%28=x").is_err());
    }

    #[test]
    fn test_from_query_keeps_plus_escapes_and_bare_keys() {
        let params = CallbackParams::from_query("a=1%2B1&b&&c=%E2%9C%93").unwrap();

        assert_eq!(params.get("a"), Some("1+1"));
        assert_eq!(params.get("b"), Some(""));
        assert_eq!(params.get("c"), Some("✓"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_from_query_empty() {
        assert!(CallbackParams::from_query("").unwrap().is_empty());
        assert!(CallbackParams::from_query("?").unwrap().is_empty());
    }

    #[test]
    fn test_signature_accessor() {
        let params: CallbackParams = "id=1&hash=abc".parse().unwrap();
        assert_eq!(params.signature(), Some("abc"));
    }

    #[test]
    fn test_to_query_roundtrips() {
        let params = CallbackParams::from_query("username=a+b&id=7").unwrap();
        let again = CallbackParams::from_query(&params.to_query()).unwrap();
        assert_eq!(params, again);
    }

    #[test]
    fn test_from_hashmap() {
        let mut map = HashMap::new();
        map.insert("id".to_string(), "42".to_string());
        let params = CallbackParams::from(map);
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_limits_field_count() {
        let limits = CallbackLimits {
            max_fields: 2,
            max_field_len: 16,
        };
        let params: CallbackParams = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert!(matches!(
            limits.check(&params),
            Err(CryptoError::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_limits_field_length() {
        let limits = CallbackLimits {
            max_fields: 8,
            max_field_len: 4,
        };
        let params: CallbackParams = [("id", "123456")].into_iter().collect();
        assert!(limits.check(&params).is_err());

        let params: CallbackParams = [("id", "1234")].into_iter().collect();
        assert!(limits.check(&params).is_ok());
    }

    #[test]
    fn test_from_query_bounded_rejects_huge_input() {
        let limits = CallbackLimits {
            max_fields: 1,
            max_field_len: 1,
        };
        let query = "x".repeat(limits.max_query_len() + 1);
        assert!(matches!(
            CallbackParams::from_query_bounded(&query, &limits),
            Err(CryptoError::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("ééé", 2), "éé");
        assert_eq!(truncate("ab", 5), "ab");
    }
}
