// Unsafe Port Table Contract Tests
//
// The blocklist mirrors the ports browsers refuse to connect to. It is a
// compatibility table, not a tuning parameter: entries are only ever
// added or removed to track the browsers themselves.

use freeport_core::{is_safe_port, is_unsafe_port};

/// WHY: these ports are refused by every major browser
/// BREAKS: a "successfully" resolved port that no browser will open
#[test]
fn browser_blocked_ports_are_unsafe() {
    for port in [1, 7, 9, 22, 23, 25, 53, 111, 137, 139, 143, 179, 465, 587, 993, 995, 6000, 6667, 10080] {
        assert!(is_unsafe_port(port), "port {} must stay blocklisted", port);
    }
}

/// WHY: common development and service ports are not on the list
/// BREAKS: the resolver would refuse ports that work everywhere
#[test]
fn common_service_ports_are_safe() {
    for port in [80, 443, 3000, 3001, 4000, 5000, 8000, 8080, 8443, 9000, 65535] {
        assert!(is_safe_port(port), "port {} must stay usable", port);
    }
}

/// WHY: safe and unsafe are exact complements, with no third state
/// BREAKS: a port that is neither accepted nor filtered would make the
/// candidate walk undefined
#[test]
fn safe_and_unsafe_are_exact_complements() {
    for port in (0..=u16::MAX).step_by(7) {
        assert_eq!(is_safe_port(port), !is_unsafe_port(port), "port {}", port);
    }
    assert_eq!(is_safe_port(u16::MAX), !is_unsafe_port(u16::MAX));
}

/// WHY: the table is fixed for the process lifetime
/// BREAKS: resolution results changing between two identical calls
#[test]
fn membership_is_stable_across_calls() {
    for _ in 0..3 {
        assert!(is_unsafe_port(22));
        assert!(is_safe_port(8080));
    }
}
