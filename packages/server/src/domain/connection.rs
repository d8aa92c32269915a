//! Connection handle and its outbound queue.
//!
//! ## Ownership
//!
//! `ConnectionHandle` is what the hub keeps for routing. It holds the only
//! `Sender` of the connection's bounded outbound queue, so the queue is
//! closed exactly when the hub drops the handle. The receiving half
//! (`OutboundQueue`) is owned by the connection's outbound loop.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use super::{
    entity::{Participant, SignalingMessage},
    error::PushError,
    value_object::{ConnectionId, MeetingId, UserId},
};

/// Sending half of an outbound queue
pub type OutboundSender = mpsc::Sender<Arc<SignalingMessage>>;
/// Receiving half of an outbound queue
pub type OutboundReceiver = mpsc::Receiver<Arc<SignalingMessage>>;

/// Routing reference to one live connection, held by the hub
#[derive(Debug)]
pub struct ConnectionHandle {
    id: ConnectionId,
    participant: Participant,
    meeting_id: MeetingId,
    sender: OutboundSender,
    cancel_token: CancellationToken,
}

/// The loop-owned side of a connection
#[derive(Debug)]
pub struct OutboundQueue {
    pub receiver: OutboundReceiver,
    /// Cancelled when the hub forcibly closes the connection
    pub cancel_token: CancellationToken,
}

impl ConnectionHandle {
    /// Create a handle and its outbound queue with room for `capacity` messages.
    pub fn new(
        id: ConnectionId,
        participant: Participant,
        meeting_id: MeetingId,
        capacity: usize,
    ) -> (Self, OutboundQueue) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let cancel_token = CancellationToken::new();
        let handle = Self {
            id,
            participant,
            meeting_id,
            sender,
            cancel_token: cancel_token.clone(),
        };
        (
            handle,
            OutboundQueue {
                receiver,
                cancel_token,
            },
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    pub fn user_id(&self) -> &UserId {
        &self.participant.user_id
    }

    pub fn meeting_id(&self) -> &MeetingId {
        &self.meeting_id
    }

    /// Push without waiting. A full queue is reported, never awaited.
    pub fn try_push(&self, message: Arc<SignalingMessage>) -> Result<(), PushError> {
        self.sender.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => PushError::Full,
            TrySendError::Closed(_) => PushError::Closed,
        })
    }

    /// Close the queue and signal the owning loops to stop immediately.
    pub fn evict(self) {
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DisplayName;
    use chrono::Utc;

    fn create_test_handle(capacity: usize) -> (ConnectionHandle, OutboundQueue) {
        let user_id = UserId::new("alice".to_string()).unwrap();
        let participant = Participant::new(user_id.clone(), DisplayName::from_user_id(&user_id));
        ConnectionHandle::new(
            ConnectionId::generate(),
            participant,
            MeetingId::new("m1".to_string()).unwrap(),
            capacity,
        )
    }

    fn create_test_message() -> Arc<SignalingMessage> {
        Arc::new(SignalingMessage::participant_left(
            &UserId::new("bob".to_string()).unwrap(),
            MeetingId::new("m1".to_string()).unwrap(),
            Utc::now(),
        ))
    }

    #[tokio::test]
    async fn test_try_push_reports_full_queue() {
        // テスト項目: キューが満杯の場合は待たずに Full を返す
        // given (前提条件):
        let (handle, _queue) = create_test_handle(1);
        handle.try_push(create_test_message()).unwrap();

        // when (操作):
        let result = handle.try_push(create_test_message());

        // then (期待する結果):
        assert_eq!(result, Err(PushError::Full));
    }

    #[tokio::test]
    async fn test_try_push_reports_closed_queue() {
        // テスト項目: 受信側が破棄されている場合は Closed を返す
        // given (前提条件):
        let (handle, queue) = create_test_handle(4);
        drop(queue);

        // when (操作):
        let result = handle.try_push(create_test_message());

        // then (期待する結果):
        assert_eq!(result, Err(PushError::Closed));
    }

    #[tokio::test]
    async fn test_dropping_handle_closes_queue_after_drain() {
        // テスト項目: ハンドルを破棄するとキュー残量を配信した後にクローズされる
        // given (前提条件):
        let (handle, mut queue) = create_test_handle(4);
        handle.try_push(create_test_message()).unwrap();

        // when (操作):
        drop(handle);

        // then (期待する結果):
        assert!(queue.receiver.recv().await.is_some());
        assert!(queue.receiver.recv().await.is_none());
        assert!(!queue.cancel_token.is_cancelled());
    }

    #[tokio::test]
    async fn test_evict_cancels_and_closes() {
        // テスト項目: evict するとキャンセルされキューもクローズされる
        // given (前提条件):
        let (handle, mut queue) = create_test_handle(4);

        // when (操作):
        handle.evict();

        // then (期待する結果):
        assert!(queue.cancel_token.is_cancelled());
        assert!(queue.receiver.recv().await.is_none());
    }
}
