//! Error types for freeport

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FreeportError {
    #[error("Port resolution exhausted: {0}")]
    Exhausted(String),

    #[error("Timeout waiting for port: {0}")]
    WaitTimeout(String),

    #[error("Host enumeration error: {0}")]
    HostEnumeration(String),

    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Memo error: {0}")]
    Memo(String),

    #[error("Socket error: {0}")]
    Socket(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FreeportError>;
