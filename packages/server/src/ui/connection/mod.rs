//! Per-connection actor.
//!
//! An admitted, registered connection runs two loops on separate tasks:
//! the inbound loop decodes client frames and relays them through the
//! hub, and the outbound loop drains the connection's queue onto the
//! socket and keeps it alive with pings. They share fate: when either
//! finishes the other is aborted and the connection is unregistered.

mod inbound;
mod outbound;

use std::sync::Arc;

use axum::extract::ws::WebSocket;
use futures_util::StreamExt;

use crate::{
    domain::ConnectionId,
    ui::state::AppState,
    usecase::ConnectedSession,
};

use inbound::inbound_loop;
use outbound::outbound_loop;

/// Lifecycle of one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// Token and meeting id accepted, upgrade pending
    Admitted,
    /// Registered with the hub, both loops running
    Running,
    /// One loop finished, tearing down
    Closing,
    /// Unregistered
    Closed,
}

pub(crate) fn log_phase(connection_id: ConnectionId, phase: ConnectionPhase) {
    tracing::debug!("Connection {} is now {:?}", connection_id, phase);
}

/// Run both loops of a registered connection until one of them ends.
pub async fn run_connection(socket: WebSocket, session: ConnectedSession, state: Arc<AppState>) {
    let ConnectedSession {
        connection_id,
        participant,
        meeting_id,
        outbound,
    } = session;
    let user_id = participant.user_id;
    let settings = state.connection_settings;

    log_phase(connection_id, ConnectionPhase::Running);

    let (sink, stream) = socket.split();

    let mut recv_task = tokio::spawn(inbound_loop(
        stream,
        state.relay_signal_usecase.clone(),
        connection_id,
        user_id.clone(),
        meeting_id.clone(),
        settings.read_timeout,
    ));
    let mut send_task = tokio::spawn(outbound_loop(sink, outbound, settings));

    // If any one of the tasks completes, abort the other
    tokio::select! {
        exit = &mut recv_task => {
            send_task.abort();
            tracing::info!("Connection {} of '{}' closed by inbound side: {:?}", connection_id, user_id, exit);
        },
        exit = &mut send_task => {
            recv_task.abort();
            tracing::info!("Connection {} of '{}' closed by outbound side: {:?}", connection_id, user_id, exit);
        },
    };

    log_phase(connection_id, ConnectionPhase::Closing);

    if let Err(e) = state
        .disconnect_participant_usecase
        .execute(connection_id)
        .await
    {
        tracing::warn!(
            "Failed to unregister connection {} of '{}' from meeting '{}': {}",
            connection_id,
            user_id,
            meeting_id,
            e
        );
    }

    log_phase(connection_id, ConnectionPhase::Closed);
}
