//! UseCase: 会議参加者一覧取得

use std::sync::Arc;

use crate::domain::{MeetingId, Participant, SignalingHub};

use super::error::GetParticipantsError;

/// 参加者一覧取得のユースケース
pub struct GetParticipantsUseCase {
    hub: Arc<dyn SignalingHub>,
}

impl GetParticipantsUseCase {
    pub fn new(hub: Arc<dyn SignalingHub>) -> Self {
        Self { hub }
    }

    /// Snapshot of the meeting's current members; unknown meetings are empty.
    pub async fn execute(&self, meeting_id: String) -> Result<Vec<Participant>, GetParticipantsError> {
        let meeting_id = MeetingId::new(meeting_id)?;
        Ok(self.hub.participants(&meeting_id).await)
    }
}
