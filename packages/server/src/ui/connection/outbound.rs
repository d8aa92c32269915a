//! Outbound loop: queued messages and keepalive pings out to the socket.

use std::{fmt::Display, time::Duration};

use axum::{
    body::Bytes,
    extract::ws::{CloseFrame, Message, Utf8Bytes, close_code},
};
use futures_util::{Sink, SinkExt};
use thiserror::Error;
use tokio::time::{self, Instant};

use crate::{
    config::ConnectionSettings, domain::OutboundQueue,
    infrastructure::dto::websocket::SignalEnvelope,
};

/// Why the outbound loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OutboundExit {
    /// The hub dropped the connection's queue
    QueueClosed,
    /// The hub evicted the connection
    Evicted,
    /// A message or ping could not be written
    WriteFailed(WriteError),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub(crate) enum WriteError {
    #[error("write timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),
}

/// Write queued messages in order until the queue closes or the hub evicts us.
///
/// Every write, including pings and the final Close frame, must complete
/// within the write timeout.
pub(crate) async fn outbound_loop<S>(
    mut sink: S,
    mut queue: OutboundQueue,
    settings: ConnectionSettings,
) -> OutboundExit
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let period = settings.keepalive_interval;
    let mut keepalive = time::interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            biased;

            _ = queue.cancel_token.cancelled() => {
                let frame = close_frame(close_code::POLICY, "evicted");
                if let Err(e) = write(&mut sink, frame, settings.write_timeout).await {
                    tracing::debug!("Close frame after eviction not delivered: {}", e);
                }
                return OutboundExit::Evicted;
            }

            message = queue.receiver.recv() => {
                let Some(message) = message else {
                    let frame = close_frame(close_code::NORMAL, "");
                    if let Err(e) = write(&mut sink, frame, settings.write_timeout).await {
                        tracing::debug!("Close frame not delivered: {}", e);
                    }
                    return OutboundExit::QueueClosed;
                };

                let text = match serde_json::to_string(&SignalEnvelope::from(message.as_ref())) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!("Failed to serialize '{}' message: {}", message.kind, e);
                        continue;
                    }
                };
                if let Err(e) = write(&mut sink, Message::Text(text.into()), settings.write_timeout).await {
                    tracing::warn!("Failed to deliver '{}' message: {}", message.kind, e);
                    return OutboundExit::WriteFailed(e);
                }
            }

            _ = keepalive.tick() => {
                if let Err(e) = write(&mut sink, Message::Ping(Bytes::new()), settings.write_timeout).await {
                    tracing::warn!("Keepalive ping failed: {}", e);
                    return OutboundExit::WriteFailed(e);
                }
            }
        }
    }
}

fn close_frame(code: u16, reason: &'static str) -> Message {
    Message::Close(Some(CloseFrame {
        code,
        reason: Utf8Bytes::from_static(reason),
    }))
}

async fn write<S>(sink: &mut S, message: Message, deadline: Duration) -> Result<(), WriteError>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    match time::timeout(deadline, sink.send(message)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(WriteError::Transport(e.to_string())),
        Err(_) => Err(WriteError::Timeout),
    }
}
