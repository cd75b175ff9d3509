//! Local host enumeration
//!
//! A port that is free on one interface can still be bound on another, so
//! availability checks without an explicit host run against every reachable
//! local address. The list starts with caller-supplied entries (the default
//! host marker and the wildcard), then appends each non-loopback interface
//! address, skipping IPv6 link-local addresses.

use std::net::IpAddr;

use crate::errors::{FreeportError, Result};

/// A probe target host. `None` is the default-host marker: bind the
/// unspecified address and let the OS pick the address family.
pub type HostAddress = Option<String>;

/// List local addresses to probe, seeded with `additional` entries.
///
/// Supplied entries come first, followed by every non-loopback interface
/// address that is not IPv6 link-local, de-duplicated with insertion order
/// preserved.
///
/// # Errors
/// Returns `FreeportError::HostEnumeration` when the OS interface table
/// cannot be read. Callers that need a non-throwing probe fall back to the
/// seed list.
pub fn get_local_hosts(additional: &[HostAddress]) -> Result<Vec<HostAddress>> {
    let mut hosts: Vec<HostAddress> = Vec::new();

    for entry in additional {
        if !hosts.contains(entry) {
            hosts.push(entry.clone());
        }
    }

    let interfaces = if_addrs::get_if_addrs().map_err(|e| {
        FreeportError::HostEnumeration(format!("Failed to read network interfaces: {}", e))
    })?;

    for interface in interfaces {
        if interface.is_loopback() {
            continue;
        }
        let ip = interface.ip();
        if is_link_local_v6(&ip) {
            continue;
        }
        let entry = Some(ip.to_string());
        if !hosts.contains(&entry) {
            hosts.push(entry);
        }
    }

    Ok(hosts)
}

// fe80::/10
fn is_link_local_v6(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V6(v6) => (v6.segments()[0] & 0xffc0) == 0xfe80,
        IpAddr::V4(_) => false,
    }
}
