//! Constant-time operations for security.

use subtle::ConstantTimeEq;

/// Compare two byte slices in constant time.
///
/// The running time depends only on the lengths, never on the position of
/// the first differing byte. Slices of different length compare unequal
/// immediately; lengths are not secret here (hex digests are fixed-size).
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
