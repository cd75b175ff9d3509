//! Integration tests for memoized resolution
//!
//! The memo store keeps one resolved port per name, so repeated runs of
//! the same tool land on the same port while it stays free and move on
//! when it does not.

use std::net::TcpListener as StdTcpListener;

use freeport_core::{get_port_memoized, FileMemo, MemoStore, PortOptions};
use tempfile::TempDir;

const LOOPBACK: &str = "127.0.0.1";

fn reserve_port() -> u16 {
    let listener = StdTcpListener::bind((LOOPBACK, 0)).unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn named_options(name: &str, port: Option<u16>) -> PortOptions {
    PortOptions {
        name: Some(name.to_string()),
        port,
        host: Some(LOOPBACK.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_resolution_is_persisted_under_name() {
    let temp_dir = TempDir::new().unwrap();
    let mut memo = FileMemo::new(temp_dir.path()).unwrap();

    let port = reserve_port();
    let resolved = get_port_memoized(named_options("web", Some(port)), &mut memo)
        .await
        .unwrap();

    assert_eq!(resolved, port);
    assert_eq!(memo.get("port_web"), Some(port));
    assert!(temp_dir.path().join(".fports").exists());
}

#[tokio::test]
async fn test_second_resolution_reuses_memoized_port() {
    let temp_dir = TempDir::new().unwrap();

    let port = reserve_port();
    {
        let mut memo = FileMemo::new(temp_dir.path()).unwrap();
        let first = get_port_memoized(named_options("api", Some(port)), &mut memo)
            .await
            .unwrap();
        assert_eq!(first, port);
    }

    // fresh store, no explicit port: the memoized value drives the result
    let mut memo = FileMemo::new(temp_dir.path()).unwrap();
    let second = get_port_memoized(named_options("api", None), &mut memo)
        .await
        .unwrap();
    assert_eq!(second, port);
}

#[tokio::test]
async fn test_occupied_memoized_port_is_replaced() {
    let temp_dir = TempDir::new().unwrap();
    let mut memo = FileMemo::new(temp_dir.path()).unwrap();

    let port = reserve_port();
    memo.set("port_worker", port).unwrap();

    let _holder = StdTcpListener::bind((LOOPBACK, port)).unwrap();

    let resolved = get_port_memoized(named_options("worker", None), &mut memo)
        .await
        .unwrap();

    assert_ne!(resolved, port);
    // the store now points at the replacement
    assert_eq!(memo.get("port_worker"), Some(resolved));
}

#[tokio::test]
async fn test_names_are_memoized_independently() {
    let temp_dir = TempDir::new().unwrap();
    let mut memo = FileMemo::new(temp_dir.path()).unwrap();

    let first = reserve_port();
    let second = reserve_port();

    get_port_memoized(named_options("front", Some(first)), &mut memo)
        .await
        .unwrap();
    get_port_memoized(named_options("back", Some(second)), &mut memo)
        .await
        .unwrap();

    assert_eq!(memo.get("port_front"), Some(first));
    assert_eq!(memo.get("port_back"), Some(second));
}
