/**
 * probe.rs
 * Bind probing against the OS socket layer
 *
 * Availability is established by actually binding a listener, never by
 * connect attempts or heuristics. Each probe opens one listening socket,
 * reads back the OS-assigned port, and drops the listener before the
 * outcome is returned, on every exit path.
 *
 * Error policy: any bind failure counts as "unavailable". That covers
 * address-in-use and permission-denied, and also invalid or unresolvable
 * hosts - an unreachable host never reports a port as free here.
 */
use tokio::net::TcpListener;
use tracing::debug;

use crate::hosts::{get_local_hosts, HostAddress};
use crate::log;
use crate::ports::unsafe_list::is_safe_port;

/// Host argument of an availability check.
///
/// `Local` stands for "no host given": the check runs against every
/// reachable local address plus the wildcard.
#[derive(Debug, Clone, Default)]
pub enum Hosts {
    #[default]
    Local,
    Single(HostAddress),
    List(Vec<HostAddress>),
}

impl From<&str> for Hosts {
    fn from(host: &str) -> Self {
        Hosts::Single(Some(host.to_string()))
    }
}

impl From<String> for Hosts {
    fn from(host: String) -> Self {
        Hosts::Single(Some(host))
    }
}

impl From<HostAddress> for Hosts {
    fn from(host: HostAddress) -> Self {
        Hosts::Single(host)
    }
}

impl From<Vec<String>> for Hosts {
    fn from(hosts: Vec<String>) -> Self {
        Hosts::List(hosts.into_iter().map(Some).collect())
    }
}

impl From<Vec<HostAddress>> for Hosts {
    fn from(hosts: Vec<HostAddress>) -> Self {
        Hosts::List(hosts)
    }
}

/// Attempt to bind one `(port, host)` pair.
///
/// Returns the actual bound port on success (the OS rewrites `0` to an
/// assigned value), or `None` when the bind fails or the bound port is on
/// the unsafe-port blocklist. The listener is closed before returning.
pub async fn try_port(port: u16, host: Option<&str>) -> Option<u16> {
    let bound = match host {
        Some(host) => bind_once(port, host).await,
        // default host: unspecified address, IPv6 first with IPv4 fallback
        None => match bind_once(port, "::").await {
            Some(port) => Some(port),
            None => bind_once(port, "0.0.0.0").await,
        },
    }?;

    if is_safe_port(bound) {
        Some(bound)
    } else {
        None
    }
}

async fn bind_once(port: u16, host: &str) -> Option<u16> {
    match TcpListener::bind((host, port)).await {
        Ok(listener) => {
            let bound = listener.local_addr().ok()?.port();
            debug!(port, host, bound, "bind probe succeeded");
            drop(listener);
            Some(bound)
        }
        Err(err) => {
            debug!(port, host, error = %err, "bind probe failed");
            None
        }
    }
}

/// Check whether a port is available, without failing.
///
/// With `Hosts::Local` the check covers the default host, the wildcard and
/// every enumerated interface address; if enumeration itself fails the
/// check degrades to the seed pair (the resolver layer treats enumeration
/// failure as fatal instead, see `ports::resolver`).
///
/// A list is checked with AND semantics: the port counts as available only
/// when every host accepts the bind. The walk short-circuits on the first
/// failing host. When probing with port `0`, the first host's OS-assigned
/// port is pinned and re-checked on the remaining hosts, so one identical
/// port is validated across all interfaces.
pub async fn check_port(port: u16, hosts: Hosts, verbose: bool) -> Option<u16> {
    match hosts {
        Hosts::Single(host) => try_port(port, host.as_deref()).await,
        Hosts::Local => {
            let seed = [None, Some("0.0.0.0".to_string())];
            let list = match get_local_hosts(&seed) {
                Ok(list) => list,
                Err(err) => {
                    log(
                        verbose,
                        &format!("Failed to enumerate local hosts: {}. Checking wildcard only.", err),
                    );
                    seed.to_vec()
                }
            };
            check_port_on_hosts(port, &list, verbose).await
        }
        Hosts::List(list) => check_port_on_hosts(port, &list, verbose).await,
    }
}

pub(crate) async fn check_port_on_hosts(
    mut port: u16,
    hosts: &[HostAddress],
    verbose: bool,
) -> Option<u16> {
    for host in hosts {
        match try_port(port, host.as_deref()).await {
            Some(bound) => {
                if port == 0 && bound != 0 {
                    // pin the OS-assigned port for the remaining hosts
                    port = bound;
                }
            }
            None => {
                if port > 0 && port < 1024 {
                    log(
                        verbose,
                        &format!(
                            "Unable to listen to the privileged port {} {}",
                            port,
                            fmt_on_host(host.as_deref())
                        ),
                    );
                }
                return None;
            }
        }
    }
    Some(port)
}

pub(crate) fn fmt_on_host(host: Option<&str>) -> String {
    match host {
        Some(host) => format!("on host {:?}", host),
        None => "on any host".to_string(),
    }
}
