//! SignalingHub trait 定義
//!
//! The routing coordinator as seen from the use cases. The concrete
//! single-writer implementation lives in `infrastructure::hub`.

use async_trait::async_trait;

use super::{
    connection::ConnectionHandle,
    entity::{Participant, SignalingMessage},
    error::HubError,
    value_object::{ConnectionId, MeetingId},
};

/// Routing coordinator for live connections.
///
/// `register`, `unregister` and `dispatch` are requests handed to the
/// coordinator; they return once the request has been enqueued, and the
/// coordinator applies them strictly in arrival order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignalingHub: Send + Sync {
    /// Make a connection routable and announce it to its meeting
    async fn register(&self, connection: ConnectionHandle) -> Result<(), HubError>;

    /// Remove a connection; unknown ids are a no-op
    async fn unregister(&self, connection_id: ConnectionId) -> Result<(), HubError>;

    /// Route a stamped message sent on connection `sender` to its recipient(s).
    ///
    /// Dropped unless `sender` is still the routed connection of `message.from`.
    async fn dispatch(
        &self,
        sender: ConnectionId,
        message: SignalingMessage,
    ) -> Result<(), HubError>;

    /// Point-in-time membership of a meeting, sorted by user id
    async fn participants(&self, meeting_id: &MeetingId) -> Vec<Participant>;
}
