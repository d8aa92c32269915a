//! HTTP and WebSocket surface of the signaling service.

mod connection;
mod handler;
mod server;
mod signal;
pub mod state;

pub use connection::ConnectionPhase;
pub use server::Server;
