//! Real-time signaling core for Conclave meetings.
//!
//! Relays WebRTC negotiation messages between the participants of a
//! meeting over WebSocket. Layered as:
//!
//! - `domain`: value objects, entities and the collaborator traits
//! - `usecase`: one struct per operation
//! - `infrastructure`: the hub, the JWT validator and the wire DTOs
//! - `ui`: the axum server, handlers and per-connection loops

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
