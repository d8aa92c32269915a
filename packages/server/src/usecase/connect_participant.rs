//! UseCase: 参加者接続処理
//!
//! Builds the connection for an admitted participant and hands it to the
//! hub. Registration completes before the caller starts either connection
//! loop, so the connection is routable before its first inbound frame.

use std::sync::Arc;

use crate::domain::{
    ConnectionHandle, ConnectionId, MeetingId, OutboundQueue, Participant, SignalingHub,
};

use super::{admit_participant::Admission, error::ConnectError};

/// A registered connection, ready to start its loops
#[derive(Debug)]
pub struct ConnectedSession {
    pub connection_id: ConnectionId,
    pub participant: Participant,
    pub meeting_id: MeetingId,
    pub outbound: OutboundQueue,
}

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    hub: Arc<dyn SignalingHub>,
    outbound_queue_capacity: usize,
}

impl ConnectParticipantUseCase {
    pub fn new(hub: Arc<dyn SignalingHub>, outbound_queue_capacity: usize) -> Self {
        Self {
            hub,
            outbound_queue_capacity,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectedSession)` - Registered; the outbound queue belongs to the caller
    /// * `Err(ConnectError)` - The hub is not running
    pub async fn execute(&self, admission: Admission) -> Result<ConnectedSession, ConnectError> {
        let connection_id = ConnectionId::generate();
        let (handle, outbound) = ConnectionHandle::new(
            connection_id,
            admission.participant.clone(),
            admission.meeting_id.clone(),
            self.outbound_queue_capacity,
        );

        self.hub.register(handle).await?;

        Ok(ConnectedSession {
            connection_id,
            participant: admission.participant,
            meeting_id: admission.meeting_id,
            outbound,
        })
    }
}
