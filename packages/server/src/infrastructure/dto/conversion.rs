//! Conversion logic between DTOs and domain entities.

use conclave_shared::time::to_rfc3339_millis;

use crate::{
    domain::{Participant, SignalingMessage},
    infrastructure::dto::{http::ParticipantDto, websocket as dto},
    usecase::RelayRequest,
};

// ========================================
// DTO → Domain
// ========================================

impl From<dto::InboundSignal> for RelayRequest {
    fn from(signal: dto::InboundSignal) -> Self {
        Self {
            kind: signal.kind,
            payload: signal.data.unwrap_or_default(),
            to: signal.to,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&SignalingMessage> for dto::SignalEnvelope {
    fn from(message: &SignalingMessage) -> Self {
        Self {
            kind: message.kind.clone(),
            data: message.payload.clone(),
            from: message.from.as_str().to_string(),
            to: message
                .to
                .as_ref()
                .map(|to| to.as_str().to_string())
                .unwrap_or_default(),
            meeting_id: message.meeting_id.as_str().to_string(),
            timestamp: to_rfc3339_millis(message.timestamp),
        }
    }
}

impl From<&Participant> for ParticipantDto {
    fn from(participant: &Participant) -> Self {
        Self {
            user_id: participant.user_id.as_str().to_string(),
            username: participant.display_name.as_str().to_string(),
        }
    }
}
