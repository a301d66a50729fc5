//! Verification code generation and checking.

use chrono::{DateTime, Utc};
use rand::Rng;
use subtle::ConstantTimeEq;

/// Number of digits in a verification code
pub const CODE_LENGTH: usize = 6;

// Codes are drawn from [100000, 999999], so their string form never has a
// leading zero and is always exactly CODE_LENGTH digits.
const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

/// Generate a random six-digit verification code.
pub fn generate_code() -> String {
    generate_code_with(&mut rand::rng())
}

pub(crate) fn generate_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.random_range(CODE_MIN..=CODE_MAX).to_string()
}

/// Compare a stored code against a submitted one in constant time.
pub(crate) fn codes_match(stored: &str, submitted: &str) -> bool {
    stored.as_bytes().ct_eq(submitted.as_bytes()).into()
}

/// Whether a challenge expiry has passed at `now`.
///
/// A code checked exactly at its expiry instant is still accepted; the code
/// goes stale only strictly after it.
pub(crate) fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at < now
}
