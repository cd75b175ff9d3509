/**
 * address.rs
 * Local inter-process socket address builder
 *
 * Independent of the TCP resolution core: formats a deterministic,
 * platform-appropriate socket path from a human-readable name. Windows
 * gets a named pipe, everything else a socket file in the OS temp
 * directory. Linux abstract-namespace sockets are deliberately not
 * produced: stable std/tokio cannot bind them (see DESIGN.md).
 */

use once_cell::sync::OnceCell;
use rand::Rng;
use std::path::PathBuf;

/// Socket naming options
#[derive(Debug, Clone, Default)]
pub struct SocketOptions {
    /// Human-readable prefix for the socket name
    pub name: String,
    /// Append the process id
    pub pid: bool,
    /// Append a random number
    pub random: bool,
}

/// Format a platform-appropriate socket address.
///
/// The name is `<name>[-<pid>][-<random>].sock`. With `pid` and `random`
/// off the result is fully deterministic for a given name and platform.
pub fn socket_address(options: &SocketOptions) -> PathBuf {
    let mut parts = vec![options.name.clone()];
    if options.pid {
        parts.push(std::process::id().to_string());
    }
    if options.random {
        parts.push(rand::thread_rng().gen_range(0..10_000u32).to_string());
    }

    let socket_name = format!("{}.sock", parts.join("-"));

    if cfg!(windows) {
        PathBuf::from(r"\\.\pipe").join(socket_name)
    } else {
        std::env::temp_dir().join(socket_name)
    }
}

static SOCKET_SUPPORTED: OnceCell<bool> = OnceCell::new();

/// Test whether the current environment supports local sockets.
///
/// Probes once by binding a throwaway socket; the result is cached for
/// the process lifetime.
pub fn is_socket_supported() -> bool {
    *SOCKET_SUPPORTED.get_or_init(probe_socket)
}

#[cfg(unix)]
fn probe_socket() -> bool {
    let path = socket_address(&SocketOptions {
        name: "freeport".to_string(),
        pid: false,
        random: true,
    });
    let supported = std::os::unix::net::UnixListener::bind(&path).is_ok();
    let _ = std::fs::remove_file(&path);
    supported
}

#[cfg(not(unix))]
fn probe_socket() -> bool {
    // named pipes need no bind probe
    true
}
