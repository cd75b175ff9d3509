//! Hostname validation with policy-driven fallback
//!
//! An invalid hostname never aborts a resolution. It is replaced with a
//! usable bind address: the wildcard for public-facing callers, loopback
//! otherwise.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::log;

// Letters, digits, dot, hyphen, colon (IPv6 literals), 1-63 chars.
// Leading/trailing hyphen checked separately; the regex crate has no
// lookaround.
static HOSTNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Za-z.:-]{1,63}$").expect("hostname regex"));

/// Syntactic hostname check
pub fn is_valid_hostname(host: &str) -> bool {
    HOSTNAME_RE.is_match(host) && !host.starts_with('-') && !host.ends_with('-')
}

/// Validate a hostname, substituting a policy-driven fallback on failure.
///
/// Returns the host unchanged when it passes the syntax rule. On failure
/// the fallback is `"0.0.0.0"` when the caller signaled public-facing
/// intent, else `"127.0.0.1"`, with a diagnostic when verbose. An absent
/// host passes through as `None` (resolve against local addresses).
///
/// Never fails: the result is always a usable host spec.
pub fn validate_hostname(host: Option<&str>, public: bool, verbose: bool) -> Option<String> {
    let host = host?;
    if is_valid_hostname(host) {
        return Some(host.to_string());
    }
    let fallback = if public { "0.0.0.0" } else { "127.0.0.1" };
    log(
        verbose,
        &format!(
            "Invalid hostname: {:?}. Using {:?} as fallback.",
            host, fallback
        ),
    );
    Some(fallback.to_string())
}
