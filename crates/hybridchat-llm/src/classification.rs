//! Failure classification for primary-provider errors.
//!
//! A failure is fallback-worthy when it looks environmental (auth, quota,
//! upstream outage, unreachable host) rather than a problem with the request
//! itself. The policy is two literal tables so it can be reviewed and
//! enumerated in tests.

use crate::backend::LlmError;

/// Upstream statuses that send the request to the secondary provider.
pub const FALLBACK_STATUS_CODES: &[u16] = &[401, 429, 500, 502, 503, 504];

/// Case-insensitive substrings that mark a connection-level failure.
/// Matched against the full error text regardless of status.
pub const TRANSPORT_ERROR_PATTERNS: &[&str] = &[
    "econnrefused",
    "etimedout",
    "enotfound",
    "fetch failed",
    "connection refused",
    "timed out",
    "dns error",
    "failed to lookup address",
    "error sending request",
];

/// Whether a primary failure should be retried once on the secondary.
pub fn is_fallback_worthy(err: &LlmError) -> bool {
    if let Some(status) = err.status() {
        if FALLBACK_STATUS_CODES.contains(&status) {
            return true;
        }
    }
    let text = err.to_string().to_lowercase();
    TRANSPORT_ERROR_PATTERNS.iter().any(|p| text.contains(p))
}
