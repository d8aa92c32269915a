//! UseCase: シグナリングメッセージ中継
//!
//! Stamps the trusted fields of an inbound message (`from`, `meeting_id`,
//! `timestamp`) and forwards it to the hub for routing. Whatever identity
//! fields the client sent are discarded before this point.

use std::sync::Arc;

use conclave_shared::time::Clock;
use serde_json::{Map, Value};

use crate::domain::{ConnectionId, MeetingId, SignalingHub, SignalingMessage, UserId};

use super::error::RelayError;

/// The client-controlled part of an inbound message
#[derive(Debug, Clone, PartialEq)]
pub struct RelayRequest {
    pub kind: String,
    pub payload: Map<String, Value>,
    /// `None` or blank means broadcast to the meeting
    pub to: Option<String>,
}

/// メッセージ中継のユースケース
pub struct RelaySignalUseCase {
    hub: Arc<dyn SignalingHub>,
    clock: Arc<dyn Clock>,
}

impl RelaySignalUseCase {
    pub fn new(hub: Arc<dyn SignalingHub>, clock: Arc<dyn Clock>) -> Self {
        Self { hub, clock }
    }

    /// メッセージ中継を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - Connection the frame arrived on
    /// * `from` - Authenticated sender of that connection
    /// * `meeting_id` - Meeting the connection is scoped to
    /// * `request` - Decoded client payload
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        from: &UserId,
        meeting_id: &MeetingId,
        request: RelayRequest,
    ) -> Result<(), RelayError> {
        if request.kind.trim().is_empty() {
            return Err(RelayError::EmptyType);
        }

        let to = match request.to.filter(|t| !t.is_empty()) {
            Some(target) => Some(UserId::new(target).map_err(RelayError::InvalidTarget)?),
            None => None,
        };

        let message = SignalingMessage {
            kind: request.kind,
            payload: request.payload,
            from: from.clone(),
            to,
            meeting_id: meeting_id.clone(),
            timestamp: self.clock.now(),
        };

        self.hub.dispatch(connection_id, message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HubError, MockSignalingHub, ValueObjectError};
    use conclave_shared::time::FixedClock;

    const FIXED_MILLIS: i64 = 1_700_000_000_000;

    fn alice() -> UserId {
        UserId::new("alice".to_string()).unwrap()
    }

    fn meeting() -> MeetingId {
        MeetingId::new("m1".to_string()).unwrap()
    }

    fn connection() -> ConnectionId {
        ConnectionId::generate()
    }

    fn request(kind: &str, to: Option<&str>) -> RelayRequest {
        let mut payload = Map::new();
        payload.insert("sdp".to_string(), Value::String("v=0".to_string()));
        RelayRequest {
            kind: kind.to_string(),
            payload,
            to: to.map(str::to_string),
        }
    }

    fn create_usecase(hub: MockSignalingHub) -> RelaySignalUseCase {
        RelaySignalUseCase::new(Arc::new(hub), Arc::new(FixedClock::from_millis(FIXED_MILLIS)))
    }

    #[tokio::test]
    async fn test_relay_stamps_trusted_fields() {
        // テスト項目: 送信者・会議 ID・時刻がサーバー側の値で上書きされて中継される
        // given (前提条件):
        let connection_id = connection();
        let mut hub = MockSignalingHub::new();
        hub.expect_dispatch()
            .withf(move |sender, message| {
                *sender == connection_id
                    && message.kind == "offer"
                    && message.from.as_str() == "alice"
                    && message.meeting_id.as_str() == "m1"
                    && message.to.as_ref().map(UserId::as_str) == Some("bob")
                    && message.timestamp.timestamp_millis() == FIXED_MILLIS
                    && message.payload["sdp"] == "v=0"
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = create_usecase(hub);

        // when (操作):
        let result = usecase
            .execute(connection_id, &alice(), &meeting(), request("offer", Some("bob")))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_relay_empty_target_is_broadcast() {
        // テスト項目: 宛先が空文字または未指定の場合はブロードキャストになる
        // given (前提条件):
        let mut hub = MockSignalingHub::new();
        hub.expect_dispatch()
            .withf(|_, message| message.to.is_none())
            .times(2)
            .returning(|_, _| Ok(()));
        let usecase = create_usecase(hub);

        // when (操作):
        let empty = usecase
            .execute(connection(), &alice(), &meeting(), request("chat", Some("")))
            .await;
        let missing = usecase
            .execute(connection(), &alice(), &meeting(), request("chat", None))
            .await;

        // then (期待する結果):
        assert!(empty.is_ok());
        assert!(missing.is_ok());
    }

    #[tokio::test]
    async fn test_relay_rejects_empty_type() {
        // テスト項目: type が空のメッセージは中継されない
        // given (前提条件):
        let mut hub = MockSignalingHub::new();
        hub.expect_dispatch().never();
        let usecase = create_usecase(hub);

        // when (操作):
        let result = usecase
            .execute(connection(), &alice(), &meeting(), request(" ", None))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(RelayError::EmptyType));
    }

    #[tokio::test]
    async fn test_relay_rejects_invalid_target() {
        // テスト項目: 宛先ユーザー ID が不正な場合は中継されない
        // given (前提条件):
        let mut hub = MockSignalingHub::new();
        hub.expect_dispatch().never();
        let usecase = create_usecase(hub);

        // when (操作):
        let result = usecase
            .execute(connection(), &alice(), &meeting(), request("offer", Some("   ")))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RelayError::InvalidTarget(ValueObjectError::Empty {
                field: "user_id"
            }))
        );
    }

    #[tokio::test]
    async fn test_relay_hub_unavailable() {
        // テスト項目: ハブが停止している場合はエラーを返す
        // given (前提条件):
        let mut hub = MockSignalingHub::new();
        hub.expect_dispatch()
            .returning(|_, _| Err(HubError::Unavailable));
        let usecase = create_usecase(hub);

        // when (操作):
        let result = usecase
            .execute(connection(), &alice(), &meeting(), request("chat", None))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(RelayError::Dispatch(HubError::Unavailable)));
    }
}
