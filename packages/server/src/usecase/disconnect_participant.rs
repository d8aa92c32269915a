//! UseCase: 参加者切断処理

use std::sync::Arc;

use crate::domain::{ConnectionId, HubError, SignalingHub};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    hub: Arc<dyn SignalingHub>,
}

impl DisconnectParticipantUseCase {
    pub fn new(hub: Arc<dyn SignalingHub>) -> Self {
        Self { hub }
    }

    /// Ask the hub to forget the connection.
    ///
    /// Safe to call for a connection the hub already evicted.
    pub async fn execute(&self, connection_id: ConnectionId) -> Result<(), HubError> {
        self.hub.unregister(connection_id).await
    }
}
