//! Data Transfer Objects (DTOs) for the signaling service.
//!
//! DTOs are organized by protocol:
//! - `websocket`: signaling frames exchanged over the WebSocket
//! - `http`: HTTP API response bodies

pub mod conversion;
pub mod http;
pub mod websocket;
