//! The coordinator task: the single writer of the routing table.
//!
//! Requests arrive on one queue and are applied one at a time. The write
//! guard is held for the whole of each request, including the broadcasts
//! it produces, so external snapshot readers never observe a half-applied
//! request and no other request can interleave with a join notice.

use std::{collections::VecDeque, sync::Arc};

use conclave_shared::time::Clock;
use tokio::sync::{RwLock, mpsc};

use crate::domain::{ConnectionHandle, ConnectionId, PushError, SignalingMessage};

use super::routing::RoutingTable;

/// A request for the coordinator
#[derive(Debug)]
pub(crate) enum HubCommand {
    Register(ConnectionHandle),
    Unregister(ConnectionId),
    Dispatch {
        sender: ConnectionId,
        message: SignalingMessage,
    },
}

/// Why a connection is being removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Removal {
    /// The connection's own loops finished
    Disconnected,
    /// Its outbound queue was full or closed during a push
    Unresponsive(PushError),
    /// The same user registered a newer connection
    Superseded,
}

pub(crate) struct Coordinator {
    commands: mpsc::Receiver<HubCommand>,
    table: Arc<RwLock<RoutingTable>>,
    clock: Arc<dyn Clock>,
}

impl Coordinator {
    pub(crate) fn new(
        commands: mpsc::Receiver<HubCommand>,
        table: Arc<RwLock<RoutingTable>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            commands,
            table,
            clock,
        }
    }

    /// Process requests until every sender of the request queue is gone.
    pub(crate) async fn run(mut self) {
        tracing::info!("Signaling hub started");

        while let Some(command) = self.commands.recv().await {
            let mut table = self.table.write().await;
            match command {
                HubCommand::Register(connection) => self.register(&mut table, connection),
                HubCommand::Unregister(id) => self.unregister(&mut table, id),
                HubCommand::Dispatch { sender, message } => {
                    self.dispatch(&mut table, sender, message)
                }
            }
        }

        let table = self.table.read().await;
        tracing::info!(
            "Signaling hub stopped ({} connections in {} meetings still routed)",
            table.len(),
            table.meeting_count()
        );
    }

    fn register(&self, table: &mut RoutingTable, connection: ConnectionHandle) {
        let id = connection.id();
        let participant = connection.participant().clone();
        let meeting_id = connection.meeting_id().clone();

        if let Some(previous) = table.connection_for_user(&participant.user_id).map(|c| c.id()) {
            let failed = self.remove_and_announce(table, previous, Removal::Superseded);
            self.evict_all(table, failed);
        }

        let present = table.participants(&meeting_id);
        table.insert(connection);
        tracing::info!(
            "Participant '{}' joined meeting '{}' (connection {}, {} already present)",
            participant.user_id,
            meeting_id,
            id,
            present.len()
        );

        let now = self.clock.now();
        let snapshot = Arc::new(SignalingMessage::meeting_state(
            &participant.user_id,
            meeting_id.clone(),
            &present,
            now,
        ));
        let mut failed = Vec::new();
        if let Some(joined) = table.get(id)
            && let Err(e) = joined.try_push(snapshot)
        {
            failed.push((id, e));
        }

        let notice = SignalingMessage::participant_joined(&participant, meeting_id, now);
        failed.extend(fan_out(table, Arc::new(notice)));
        self.evict_all(table, failed);
    }

    fn unregister(&self, table: &mut RoutingTable, id: ConnectionId) {
        if !table.contains(id) {
            tracing::debug!("Unregister for unknown connection {} ignored", id);
            return;
        }
        let failed = self.remove_and_announce(table, id, Removal::Disconnected);
        self.evict_all(table, failed);
    }

    fn dispatch(&self, table: &mut RoutingTable, sender: ConnectionId, message: SignalingMessage) {
        // Frames relayed before an eviction or supersede was processed
        let routed = table
            .connection_for_user(&message.from)
            .is_some_and(|c| c.id() == sender && c.meeting_id() == &message.meeting_id);
        if !routed {
            tracing::debug!(
                "Dropping '{}' from '{}': connection {} is no longer routed",
                message.kind,
                message.from,
                sender
            );
            return;
        }

        tracing::debug!(
            "Dispatching '{}' from '{}' in meeting '{}' to {}",
            message.kind,
            message.from,
            message.meeting_id,
            message.to.as_ref().map_or("<meeting>", |to| to.as_str())
        );
        let failed = fan_out(table, Arc::new(message));
        self.evict_all(table, failed);
    }

    /// Remove connections whose push failed, announcing each departure.
    ///
    /// A departure notice can itself fail to reach someone; those are
    /// queued and handled in turn rather than recursively.
    fn evict_all(&self, table: &mut RoutingTable, failed: Vec<(ConnectionId, PushError)>) {
        let mut pending: VecDeque<(ConnectionId, PushError)> = failed.into();
        while let Some((id, reason)) = pending.pop_front() {
            pending.extend(self.remove_and_announce(table, id, Removal::Unresponsive(reason)));
        }
    }

    /// Remove one connection, close its queue and tell the rest of its meeting.
    ///
    /// Returns the recipients the departure notice could not be pushed to.
    fn remove_and_announce(
        &self,
        table: &mut RoutingTable,
        id: ConnectionId,
        removal: Removal,
    ) -> Vec<(ConnectionId, PushError)> {
        let Some(connection) = table.remove(id) else {
            return Vec::new();
        };

        let user_id = connection.user_id().clone();
        let meeting_id = connection.meeting_id().clone();
        match removal {
            Removal::Disconnected => {
                tracing::info!(
                    "Participant '{}' left meeting '{}' (connection {})",
                    user_id,
                    meeting_id,
                    id
                );
                drop(connection);
            }
            Removal::Unresponsive(reason) => {
                tracing::warn!(
                    "Evicting participant '{}' from meeting '{}' (connection {}): {}",
                    user_id,
                    meeting_id,
                    id,
                    reason
                );
                connection.evict();
            }
            Removal::Superseded => {
                tracing::info!(
                    "Closing connection {} of participant '{}': superseded by a new connection",
                    id,
                    user_id
                );
                connection.evict();
            }
        }

        let notice = SignalingMessage::participant_left(&user_id, meeting_id, self.clock.now());
        fan_out(table, Arc::new(notice))
    }
}

/// Push a message to its recipients without waiting on any of them.
///
/// Point-to-point messages go to the connection currently routed for `to`
/// and are dropped when there is none. Broadcasts go to every member of the
/// meeting except the sender. Returns the recipients whose push failed.
fn fan_out(
    table: &RoutingTable,
    message: Arc<SignalingMessage>,
) -> Vec<(ConnectionId, PushError)> {
    let mut failed = Vec::new();

    match &message.to {
        Some(target) => match table.connection_for_user(target) {
            Some(recipient) => {
                if let Err(e) = recipient.try_push(message.clone()) {
                    failed.push((recipient.id(), e));
                }
            }
            None => {
                tracing::debug!(
                    "Dropping '{}' from '{}': no connection for user '{}'",
                    message.kind,
                    message.from,
                    target
                );
            }
        },
        None => {
            for recipient in table.members(&message.meeting_id) {
                if recipient.user_id() == &message.from {
                    continue;
                }
                if let Err(e) = recipient.try_push(message.clone()) {
                    failed.push((recipient.id(), e));
                }
            }
        }
    }

    failed
}
