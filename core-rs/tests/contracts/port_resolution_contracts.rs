// Port Resolution Contract Tests
//
// These tests verify INVARIANTS that must never break regardless of
// implementation details: candidate ordering, merge precedence and the
// deterministic first-fit policy. Each test names what breaks downstream
// if it ever fails.

use std::net::TcpListener as StdTcpListener;

use freeport_core::{
    generate_range, get_port_with_env, merge_options, EnvDefaults, PortOptions,
    DEFAULT_ALTERNATIVE_RANGE, DEFAULT_PORT,
};

const LOOPBACK: &str = "127.0.0.1";

fn reserve_port() -> u16 {
    let listener = StdTcpListener::bind((LOOPBACK, 0)).unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// WHY: candidates are walked in caller order, never re-sorted
/// BREAKS: callers that encode preference in list order get arbitrary ports
#[test]
fn first_fit_follows_caller_order_not_numeric_order() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        let low = reserve_port();
        let high = reserve_port();
        let (first, second) = if low > high { (low, high) } else { (high, low) };

        // "first" is numerically larger but listed first: it must win
        let options = PortOptions {
            ports: vec![first, second],
            host: Some(LOOPBACK.to_string()),
            ..Default::default()
        };
        let resolved = get_port_with_env(options, EnvDefaults::default()).await.unwrap();
        assert_eq!(resolved, first);
    });
}

/// WHY: the explicit port always precedes the extra ports list
/// BREAKS: "prefer this port" stops meaning anything
#[test]
fn explicit_port_precedes_ports_list() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        let preferred = reserve_port();
        let extra = reserve_port();

        let options = PortOptions {
            port: Some(preferred),
            ports: vec![extra],
            host: Some(LOOPBACK.to_string()),
            ..Default::default()
        };
        let resolved = get_port_with_env(options, EnvDefaults::default()).await.unwrap();
        assert_eq!(resolved, preferred);
    });
}

/// WHY: caller options always beat environment defaults
/// BREAKS: a stray PORT in the environment silently overrides application
/// configuration
#[test]
fn caller_port_beats_environment_port() {
    let options = merge_options(
        PortOptions {
            port: Some(4100),
            ..Default::default()
        },
        EnvDefaults {
            port: Some(9100),
            host: None,
        },
    );
    assert_eq!(options.port, 4100);

    let options = merge_options(
        PortOptions {
            host: Some("192.168.0.2".to_string()),
            ..Default::default()
        },
        EnvDefaults {
            port: None,
            host: Some("10.1.1.1".to_string()),
        },
    );
    assert_eq!(options.host, Some("192.168.0.2".to_string()));
}

/// WHY: a port hint of 0 means "ask the OS", which is the random branch
/// BREAKS: `get_port("0")` would walk the default candidates instead of
/// requesting an ephemeral port
#[test]
fn port_zero_forces_random_branch() {
    let options = merge_options(PortOptions::from(0u16), EnvDefaults::default());
    assert!(options.random);

    let options = merge_options(PortOptions::from("auto"), EnvDefaults::default());
    assert!(options.random);
}

/// WHY: merging is pure; the snapshot never depends on call order or
/// hidden state
/// BREAKS: identical inputs resolving to different candidate lists, i.e.
/// nondeterministic port selection
#[test]
fn merge_is_deterministic() {
    let build = || {
        merge_options(
            PortOptions {
                port: Some(4100),
                ports: vec![4200, 4300],
                port_range: Some((5000, 5010)),
                ..Default::default()
            },
            EnvDefaults::default(),
        )
    };

    let first = build();
    let second = build();
    assert_eq!(first.port, second.port);
    assert_eq!(first.ports, second.ports);
    assert_eq!(first.port_range, second.port_range);
    assert_eq!(first.alternative_port_range, second.alternative_port_range);
    assert_eq!(first.host, second.host);
}

/// WHY: ranges are half-open; the upper bound is a limit, not a candidate
/// BREAKS: off-by-one collisions with the next allocated block
#[test]
fn range_upper_bound_is_excluded() {
    let range = generate_range(3000, 3100);
    assert_eq!(range.len(), 100);
    assert_eq!(*range.first().unwrap(), 3000);
    assert_eq!(*range.last().unwrap(), 3099);
    assert!(!range.contains(&3100));

    // inverted bounds produce nothing rather than wrapping
    assert!(generate_range(3100, 3000).is_empty());
}

/// WHY: the built-in defaults are part of the public contract
/// BREAKS: tools relying on "3000 unless told otherwise" start drifting
#[test]
fn built_in_defaults_are_stable() {
    assert_eq!(DEFAULT_PORT, 3000);
    assert_eq!(DEFAULT_ALTERNATIVE_RANGE, (3000, 3100));

    let options = merge_options(PortOptions::default(), EnvDefaults::default());
    assert_eq!(options.alternative_port_range, Some(DEFAULT_ALTERNATIVE_RANGE));

    // an explicit port turns the alternative default off
    let options = merge_options(PortOptions::from(4100u16), EnvDefaults::default());
    assert_eq!(options.alternative_port_range, None);
}
