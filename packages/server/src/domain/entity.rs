//! Entities.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::value_object::{DisplayName, MeetingId, UserId};

/// Broadcast to the rest of a meeting after a connection registers.
pub const PARTICIPANT_JOINED: &str = "participant-joined";
/// Broadcast to the remaining members after a connection is removed.
pub const PARTICIPANT_LEFT: &str = "participant-left";
/// Sent only to a newly registered connection, listing who is already present.
pub const MEETING_STATE: &str = "meeting-state";

/// A member of a meeting as seen by other members
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Participant {
    pub user_id: UserId,
    pub display_name: DisplayName,
}

impl Participant {
    pub fn new(user_id: UserId, display_name: DisplayName) -> Self {
        Self {
            user_id,
            display_name,
        }
    }

    fn to_map(&self) -> Map<String, Value> {
        let mut entry = Map::new();
        entry.insert(
            "user_id".to_string(),
            Value::String(self.user_id.as_str().to_string()),
        );
        entry.insert(
            "username".to_string(),
            Value::String(self.display_name.as_str().to_string()),
        );
        entry
    }
}

/// A signaling message after the server has stamped its trusted fields.
///
/// `from`, `meeting_id` and `timestamp` are always server-assigned.
/// `to == None` means "broadcast to the meeting".
#[derive(Debug, Clone, PartialEq)]
pub struct SignalingMessage {
    pub kind: String,
    pub payload: Map<String, Value>,
    pub from: UserId,
    pub to: Option<UserId>,
    pub meeting_id: MeetingId,
    pub timestamp: DateTime<Utc>,
}

impl SignalingMessage {
    /// Notice that `participant` joined `meeting_id`
    pub fn participant_joined(
        participant: &Participant,
        meeting_id: MeetingId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: PARTICIPANT_JOINED.to_string(),
            payload: participant.to_map(),
            from: participant.user_id.clone(),
            to: None,
            meeting_id,
            timestamp,
        }
    }

    /// Notice that `user_id` left `meeting_id`
    pub fn participant_left(
        user_id: &UserId,
        meeting_id: MeetingId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut payload = Map::new();
        payload.insert(
            "user_id".to_string(),
            Value::String(user_id.as_str().to_string()),
        );
        Self {
            kind: PARTICIPANT_LEFT.to_string(),
            payload,
            from: user_id.clone(),
            to: None,
            meeting_id,
            timestamp,
        }
    }

    /// Roster snapshot addressed to a newly registered `recipient`
    pub fn meeting_state(
        recipient: &UserId,
        meeting_id: MeetingId,
        participants: &[Participant],
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut payload = Map::new();
        payload.insert(
            "participants".to_string(),
            Value::Array(
                participants
                    .iter()
                    .map(|p| Value::Object(p.to_map()))
                    .collect(),
            ),
        );
        Self {
            kind: MEETING_STATE.to_string(),
            payload,
            from: recipient.clone(),
            to: Some(recipient.clone()),
            meeting_id,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(user_id: &str, name: &str) -> Participant {
        Participant::new(
            UserId::new(user_id.to_string()).unwrap(),
            DisplayName::new(name.to_string()).unwrap(),
        )
    }

    fn meeting() -> MeetingId {
        MeetingId::new("m1".to_string()).unwrap()
    }

    #[test]
    fn test_participant_joined_is_broadcast_from_joiner() {
        // テスト項目: participant-joined は参加者本人を送信者とするブロードキャストになる
        // given (前提条件):
        let alice = participant("alice", "Alice");

        // when (操作):
        let message = SignalingMessage::participant_joined(&alice, meeting(), Utc::now());

        // then (期待する結果):
        assert_eq!(message.kind, PARTICIPANT_JOINED);
        assert_eq!(message.to, None);
        assert_eq!(message.from, alice.user_id);
        assert_eq!(message.payload["user_id"], "alice");
        assert_eq!(message.payload["username"], "Alice");
    }

    #[test]
    fn test_participant_left_references_user() {
        // テスト項目: participant-left のペイロードに退出したユーザー ID が含まれる
        // given (前提条件):
        let alice = participant("alice", "Alice");

        // when (操作):
        let message = SignalingMessage::participant_left(&alice.user_id, meeting(), Utc::now());

        // then (期待する結果):
        assert_eq!(message.kind, PARTICIPANT_LEFT);
        assert_eq!(message.to, None);
        assert_eq!(message.payload["user_id"], "alice");
        assert!(!message.payload.contains_key("username"));
    }

    #[test]
    fn test_meeting_state_is_addressed_to_recipient() {
        // テスト項目: meeting-state は新規参加者宛てで既存参加者の一覧を含む
        // given (前提条件):
        let carol = participant("carol", "Carol");
        let present = vec![participant("alice", "Alice"), participant("bob", "Bob")];

        // when (操作):
        let message =
            SignalingMessage::meeting_state(&carol.user_id, meeting(), &present, Utc::now());

        // then (期待する結果):
        assert_eq!(message.kind, MEETING_STATE);
        assert_eq!(message.to, Some(carol.user_id.clone()));
        let listed = message.payload["participants"].as_array().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0]["user_id"], "alice");
        assert_eq!(listed[1]["username"], "Bob");
    }
}
