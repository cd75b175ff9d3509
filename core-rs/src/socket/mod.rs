/**
 * socket module
 * Platform-appropriate local socket addresses
 */

pub mod address;

pub use address::{is_socket_supported, socket_address, SocketOptions};
