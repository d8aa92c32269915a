//! Domain layer.
//!
//! Value objects and entities of the signaling core, plus the traits the
//! outer layers implement (dependency inversion): `TokenValidator` for the
//! external token-validation collaborator and `SignalingHub` for the
//! routing coordinator.

pub mod connection;
pub mod entity;
pub mod error;
pub mod hub;
pub mod token;
pub mod value_object;

pub use connection::{ConnectionHandle, OutboundQueue, OutboundReceiver, OutboundSender};
pub use entity::{MEETING_STATE, PARTICIPANT_JOINED, PARTICIPANT_LEFT, Participant, SignalingMessage};
pub use error::{HubError, PushError, TokenError, ValueObjectError};
pub use hub::SignalingHub;
pub use token::{AuthenticatedUser, TokenValidator};
pub use value_object::{ConnectionId, DisplayName, MeetingId, UserId};

#[cfg(test)]
pub use hub::MockSignalingHub;
#[cfg(test)]
pub use token::MockTokenValidator;
