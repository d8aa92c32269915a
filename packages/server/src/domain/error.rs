//! Domain error types.

use thiserror::Error;

/// Validation failure while constructing a value object
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be at most {max} bytes (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{field} must not contain control characters")]
    ControlCharacter { field: &'static str },
}

/// Failure reported by the token-validation collaborator
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is invalid: {0}")]
    Invalid(String),

    #[error("token claims are invalid: {0}")]
    InvalidClaims(String),
}

/// The coordinator is no longer accepting requests
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum HubError {
    #[error("signaling hub is not running")]
    Unavailable,
}

/// Non-blocking push onto an outbound queue failed
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PushError {
    #[error("outbound queue is full")]
    Full,

    #[error("outbound queue is closed")]
    Closed,
}
