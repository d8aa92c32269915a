//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{HubError, TokenError, ValueObjectError};

/// Admission was refused before any connection state was created
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("access token is missing")]
    MissingToken,

    #[error("access token rejected: {0}")]
    Unauthorized(#[from] TokenError),

    #[error("invalid meeting id: {0}")]
    InvalidMeetingId(ValueObjectError),

    #[error("invalid display name: {0}")]
    InvalidDisplayName(ValueObjectError),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectError {
    #[error("failed to register connection: {0}")]
    Registration(#[from] HubError),
}

/// An inbound frame decoded fine but cannot be relayed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("message type must not be empty")]
    EmptyType,

    #[error("invalid target user: {0}")]
    InvalidTarget(ValueObjectError),

    #[error("failed to dispatch message: {0}")]
    Dispatch(#[from] HubError),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GetParticipantsError {
    #[error("invalid meeting id: {0}")]
    InvalidMeetingId(#[from] ValueObjectError),
}
