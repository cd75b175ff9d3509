//! # Freeport - deterministic free-port resolution
//!
//! Resolves an available TCP endpoint by probing candidate ports with real
//! bind attempts. Hints (explicit port, list, range, alternative range,
//! random) are merged into one immutable snapshot, expanded into an ordered
//! candidate list, and walked first-fit against the OS socket layer.
//!
//! ## Core Principle
//!
//! **The bind IS the truth**: availability is only ever established by
//! binding a real listener on every host that matters, never by heuristics.
//! A port is available when every reachable local address (or the one
//! explicit host) accepts the bind.
//!
//! ## Resolution chain
//!
//! ```text
//! options ──> candidates ──> primary walk ──> alternative range ──> random
//!                                │                  │                 │
//!                              found              found             found
//!                                └──────────────────┴────────┬────────┘
//!                                                          port
//! ```
//!
//! Every probe socket is scoped: bound, inspected, closed before the
//! outcome is returned. Only exhaustion and wait-timeout surface as errors;
//! OS-level bind failures are absorbed as "try the next candidate".

pub mod errors;
pub mod hosts;
pub mod memo;
pub mod ports;
pub mod socket;

pub use errors::{FreeportError, Result};
pub use hosts::{get_local_hosts, is_valid_hostname, validate_hostname, HostAddress};
pub use memo::{FileMemo, MemoMap, MemoStore};
pub use ports::{
    check_port, generate_range, get_port, get_port_memoized, get_port_with_env, get_random_port,
    is_safe_port, is_unsafe_port, merge_options, try_port, wait_for_port, EnvDefaults, Hosts,
    PortOptions, ResolvedOptions, WaitOptions, DEFAULT_ALTERNATIVE_RANGE, DEFAULT_PORT,
};
pub use socket::{is_socket_supported, socket_address, SocketOptions};

/// Crate version
pub const VERSION: &str = "0.1.0";

// Verbose-flag diagnostics, informational only. Results never depend on
// whether these lines are emitted.
pub(crate) fn log(verbose: bool, message: &str) {
    if verbose {
        eprintln!("[freeport] {}", message);
    }
}
