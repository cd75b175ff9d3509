/**
 * resolver.rs
 * Port resolution state machine
 *
 * Candidate policy, in precedence order: explicit port, extra ports list,
 * expanded numeric range, then the default port. Candidates are walked
 * first-fit in exactly that order. On exhaustion the resolver falls back
 * to the alternative range, then to an OS-assigned ephemeral port, and
 * only errors when every avenue is spent.
 *
 * Options are merged into an immutable snapshot before the first probe;
 * environment defaults are captured once per call and never re-read from
 * inside the candidate walk.
 */
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{FreeportError, Result};
use crate::hosts::{get_local_hosts, validate_hostname, HostAddress};
use crate::log;
use crate::memo::MemoStore;
use crate::ports::probe::{check_port_on_hosts, fmt_on_host, try_port};
use crate::ports::range::generate_range;
use crate::ports::unsafe_list::is_safe_port;

/// Fallback port appended to every candidate list
pub const DEFAULT_PORT: u16 = 3000;

/// Alternative range used when the caller gave no explicit port
pub const DEFAULT_ALTERNATIVE_RANGE: (u16, u16) = (3000, 3100);

/// Caller-facing resolution options. Every field is optional; missing
/// fields are filled from environment defaults and built-ins by
/// [`merge_options`].
///
/// A bare port number or numeric string converts directly:
/// `get_port(5050u16)` or `get_port("5050")`. A non-numeric string parses
/// to port `0`, which requests an OS-assigned ephemeral port.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PortOptions {
    /// Memo key for [`get_port_memoized`]
    pub name: Option<String>,
    /// Force (`Some(true)`) or forbid (`Some(false)`) the random branch
    pub random: Option<bool>,
    /// Preferred port, tried first. `0` means ephemeral.
    pub port: Option<u16>,
    /// Additional candidates, tried after `port` in the given order
    pub ports: Vec<u16>,
    /// Half-open candidate range, expanded after `ports`
    pub port_range: Option<(u16, u16)>,
    /// Half-open fallback range walked after the primary list is exhausted
    pub alternative_port_range: Option<(u16, u16)>,
    /// Host to probe; absent means every reachable local address
    pub host: Option<String>,
    /// Emit diagnostics to stderr
    pub verbose: bool,
    /// Public-facing intent: invalid hosts fall back to the wildcard
    pub public: bool,
}

impl From<u16> for PortOptions {
    fn from(port: u16) -> Self {
        PortOptions {
            port: Some(port),
            ..Default::default()
        }
    }
}

impl From<&str> for PortOptions {
    fn from(input: &str) -> Self {
        // non-numeric input requests an ephemeral port
        PortOptions::from(input.trim().parse::<u16>().unwrap_or(0))
    }
}

impl FromStr for PortOptions {
    type Err = std::convert::Infallible;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        Ok(PortOptions::from(input))
    }
}

/// Environment defaults, captured exactly once per resolution call
#[derive(Debug, Clone, Default)]
pub struct EnvDefaults {
    pub port: Option<u16>,
    pub host: Option<String>,
}

impl EnvDefaults {
    /// Read `PORT` and `HOST` from the process environment
    pub fn capture() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|value| value.trim().parse().ok()),
            host: std::env::var("HOST").ok().filter(|value| !value.is_empty()),
        }
    }
}

/// Immutable configuration snapshot driving one resolution call
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub name: String,
    pub random: bool,
    pub port: u16,
    pub ports: Vec<u16>,
    pub port_range: Option<(u16, u16)>,
    pub alternative_port_range: Option<(u16, u16)>,
    pub host: HostAddress,
    pub verbose: bool,
    random_fallback_disabled: bool,
}

/// Merge caller options with environment defaults into a snapshot.
///
/// Precedence, highest first: explicit caller value, environment value,
/// built-in default. A port hint of `0` (explicit or from a non-numeric
/// shorthand) forces the random branch. The alternative range defaults to
/// `3000..3100` only when the caller gave no explicit port.
pub fn merge_options(user: PortOptions, env: EnvDefaults) -> ResolvedOptions {
    let port_hint = user.port.or(env.port);
    let random = user.random.unwrap_or(false) || port_hint == Some(0);
    let alternative_port_range = user.alternative_port_range.or({
        match user.port {
            Some(port) if port > 0 => None,
            _ => Some(DEFAULT_ALTERNATIVE_RANGE),
        }
    });
    let host = validate_hostname(
        user.host.as_deref().or(env.host.as_deref()),
        user.public,
        user.verbose,
    );

    ResolvedOptions {
        name: user.name.unwrap_or_else(|| "default".to_string()),
        random,
        port: port_hint.unwrap_or(0),
        ports: user.ports,
        port_range: user.port_range,
        alternative_port_range,
        host,
        verbose: user.verbose,
        random_fallback_disabled: user.random == Some(false),
    }
}

/// Resolve an available port.
///
/// Walks the ordered candidate list built from the options, then the
/// alternative range, then an OS-assigned ephemeral port. The first
/// available candidate wins; given identical OS port availability and
/// identical options the result is always the same.
///
/// # Errors
/// `FreeportError::Exhausted` when every candidate, the alternative range
/// and the random fallback all failed, naming the host and everything that
/// was tried. `FreeportError::HostEnumeration` when no host was given and
/// the local interface table cannot be read.
pub async fn get_port<O: Into<PortOptions>>(input: O) -> Result<u16> {
    get_port_with_env(input.into(), EnvDefaults::capture()).await
}

/// [`get_port`] with explicit environment defaults, for callers that
/// manage the environment themselves (and for tests).
pub async fn get_port_with_env(user: PortOptions, env: EnvDefaults) -> Result<u16> {
    let options = merge_options(user, env);
    resolve(&options).await
}

pub(crate) async fn resolve(options: &ResolvedOptions) -> Result<u16> {
    if options.random {
        return get_random_port(options.host.as_deref()).await;
    }

    let hosts = resolve_hosts(&options.host)?;

    // ordered primary candidate list
    let mut candidates: Vec<u16> = Vec::new();
    let range = options
        .port_range
        .map(|(from, to)| generate_range(from, to))
        .unwrap_or_default();
    for port in std::iter::once(options.port)
        .chain(options.ports.iter().copied())
        .chain(range)
        .chain(std::iter::once(DEFAULT_PORT))
    {
        if port == 0 {
            continue;
        }
        if !is_safe_port(port) {
            log(options.verbose, &format!("Ignoring unsafe port: {}", port));
            continue;
        }
        candidates.push(port);
    }

    let mut available = find_port(&candidates, &hosts, options.verbose).await;

    // fallback: alternative range
    if available.is_none() {
        if let Some((from, to)) = options.alternative_port_range {
            available = find_port(&generate_range(from, to), &hosts, options.verbose).await;
            if !candidates.is_empty() {
                let mut message = format!(
                    "Unable to find an available port (tried {} {}).",
                    join_ports(&candidates),
                    fmt_on_host(options.host.as_deref())
                );
                if let Some(port) = available {
                    message.push_str(&format!(" Using alternative port {}.", port));
                }
                log(options.verbose, &message);
            }
        }
    }

    // fallback: OS-assigned ephemeral port
    if available.is_none() && !options.random_fallback_disabled {
        available = check_port_on_hosts(0, &hosts, options.verbose).await;
        if let Some(port) = available {
            log(options.verbose, &format!("Using random port {}", port));
        }
    }

    match available {
        Some(port) => Ok(port),
        None => Err(FreeportError::Exhausted(format!(
            "Unable to find an available port {} (tried {})",
            fmt_on_host(options.host.as_deref()),
            format_tried(options)
        ))),
    }
}

/// Resolve an OS-assigned ephemeral port, filtered by the unsafe-port
/// blocklist. Expected to succeed barring total resource exhaustion.
pub async fn get_random_port(host: Option<&str>) -> Result<u16> {
    let host_spec = host.map(str::to_string);
    let hosts = resolve_hosts(&host_spec)?;
    match check_port_on_hosts(0, &hosts, false).await {
        Some(port) => Ok(port),
        None => Err(FreeportError::Exhausted(format!(
            "Unable to find a random port {}",
            fmt_on_host(host)
        ))),
    }
}

/// Options for [`wait_for_port`]
#[derive(Debug, Clone)]
pub struct WaitOptions {
    pub host: Option<String>,
    pub delay_ms: u64,
    pub retries: u32,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            host: None,
            delay_ms: 500,
            retries: 4,
        }
    }
}

/// Poll until a port becomes free.
///
/// Probes at a fixed delay for a bounded retry count. There is no
/// cancellation: the call ends either with the port free or with
/// `FreeportError::WaitTimeout` naming the port, retry count and delay.
pub async fn wait_for_port(port: u16, options: WaitOptions) -> Result<()> {
    for attempt in 0..options.retries {
        if attempt > 0 {
            tokio::time::sleep(Duration::from_millis(options.delay_ms)).await;
        }
        if try_port(port, options.host.as_deref()).await.is_some() {
            return Ok(());
        }
    }
    Err(FreeportError::WaitTimeout(format!(
        "Port {} did not become free after {} retries with {}ms interval",
        port, options.retries, options.delay_ms
    )))
}

/// Resolve an available port and memoize it in `store` under the options'
/// `name`, so repeated runs of the same tool keep landing on the same port
/// while it stays free.
///
/// The memoized port joins the candidate list after the caller's explicit
/// hints; the final resolution is written back before returning.
pub async fn get_port_memoized<O: Into<PortOptions>>(
    input: O,
    store: &mut dyn MemoStore,
) -> Result<u16> {
    let user = input.into();
    let env = EnvDefaults::capture();
    let mut options = merge_options(user, env);

    let memo_key = format!("port_{}", options.name);
    if let Some(port) = store.get(&memo_key) {
        if is_safe_port(port) && !options.ports.contains(&port) {
            options.ports.push(port);
        }
    }

    let port = resolve(&options).await?;
    store.set(&memo_key, port)?;
    Ok(port)
}

// Hosts enforced per candidate: the explicit host alone, or every
// reachable local address seeded with the default marker and the wildcard.
// Enumeration failure is fatal at this layer.
fn resolve_hosts(host: &HostAddress) -> Result<Vec<HostAddress>> {
    match host {
        Some(host) => Ok(vec![Some(host.clone())]),
        None => get_local_hosts(&[None, Some("0.0.0.0".to_string())]),
    }
}

async fn find_port(ports: &[u16], hosts: &[HostAddress], verbose: bool) -> Option<u16> {
    for &port in ports {
        if let Some(found) = check_port_on_hosts(port, hosts, verbose).await {
            return Some(found);
        }
    }
    None
}

fn join_ports(ports: &[u16]) -> String {
    ports
        .iter()
        .map(|port| port.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_tried(options: &ResolvedOptions) -> String {
    let mut tried: Vec<String> = Vec::new();
    if options.port > 0 {
        tried.push(options.port.to_string());
    }
    if !options.ports.is_empty() {
        tried.push(join_ports(&options.ports));
    }
    if let Some((from, to)) = options.port_range {
        tried.push(format!("{}-{}", from, to));
    }
    if let Some((from, to)) = options.alternative_port_range {
        tried.push(format!("{}-{}", from, to));
    }
    if tried.is_empty() {
        tried.push(DEFAULT_PORT.to_string());
    }
    tried.join(", ")
}
