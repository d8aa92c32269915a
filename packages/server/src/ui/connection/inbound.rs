//! Inbound loop: client frames in, relay requests out.

use std::{sync::Arc, time::Duration};

use axum::extract::ws::Message;
use futures_util::{Stream, StreamExt};

use crate::{
    domain::{ConnectionId, MeetingId, UserId},
    infrastructure::dto::websocket::InboundSignal,
    usecase::{RelayError, RelaySignalUseCase},
};

/// Why the inbound loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InboundExit {
    /// The client sent a Close frame
    Closed,
    /// The stream ended without a Close frame
    Ended,
    /// The transport reported an error (including oversized frames)
    Transport(String),
    /// Nothing arrived within the read timeout
    ReadTimeout,
    /// The hub stopped accepting requests
    HubUnavailable,
}

/// Read frames until the peer goes away, relaying each decodable one.
///
/// The read deadline restarts on every frame, so Pong replies to our
/// keepalive pings keep an otherwise quiet connection alive.
pub(crate) async fn inbound_loop<S>(
    mut stream: S,
    relay: Arc<RelaySignalUseCase>,
    connection_id: ConnectionId,
    user_id: UserId,
    meeting_id: MeetingId,
    read_timeout: Duration,
) -> InboundExit
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let frame = match tokio::time::timeout(read_timeout, stream.next()).await {
            Err(_) => {
                tracing::info!(
                    "No frame from '{}' within {}s, closing",
                    user_id,
                    read_timeout.as_secs()
                );
                return InboundExit::ReadTimeout;
            }
            Ok(None) => return InboundExit::Ended,
            Ok(Some(Err(e))) => {
                tracing::warn!("WebSocket error from '{}': {}", user_id, e);
                return InboundExit::Transport(e.to_string());
            }
            Ok(Some(Ok(frame))) => frame,
        };

        let decoded = match frame {
            Message::Text(text) => serde_json::from_str::<InboundSignal>(text.as_str()),
            Message::Binary(bytes) => serde_json::from_slice::<InboundSignal>(&bytes),
            Message::Close(_) => {
                tracing::info!("Client '{}' requested close", user_id);
                return InboundExit::Closed;
            }
            Message::Ping(_) | Message::Pong(_) => continue,
        };

        let signal = match decoded {
            Ok(signal) => signal,
            Err(e) => {
                tracing::warn!("Skipping undecodable frame from '{}': {}", user_id, e);
                continue;
            }
        };

        match relay
            .execute(connection_id, &user_id, &meeting_id, signal.into())
            .await
        {
            Ok(()) => {}
            Err(RelayError::Dispatch(e)) => {
                tracing::error!("Cannot relay message from '{}': {}", user_id, e);
                return InboundExit::HubUnavailable;
            }
            Err(e) => {
                tracing::warn!("Skipping frame from '{}': {}", user_id, e);
            }
        }
    }
}
