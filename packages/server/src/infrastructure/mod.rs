//! Infrastructure layer: concrete implementations of the domain traits and
//! the wire-level DTOs.

pub mod auth;
pub mod dto;
pub mod hub;
