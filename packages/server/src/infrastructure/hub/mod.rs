//! In-process signaling hub.
//!
//! `Hub::spawn` starts the coordinator task and returns a cloneable
//! `HubHandle`. Register, unregister and dispatch requests go through the
//! coordinator's queue and are applied in arrival order; the participant
//! query reads a consistent snapshot of the routing table directly.

mod coordinator;
pub mod routing;

use std::sync::Arc;

use async_trait::async_trait;
use conclave_shared::time::Clock;
use tokio::{
    sync::{RwLock, mpsc},
    task::JoinHandle,
};

use crate::domain::{
    ConnectionHandle, ConnectionId, HubError, MeetingId, Participant, SignalingHub,
    SignalingMessage,
};

use coordinator::{Coordinator, HubCommand};
use routing::RoutingTable;

/// Entry point for starting a hub
pub struct Hub;

impl Hub {
    /// Start the coordinator with a request queue of `capacity` entries.
    ///
    /// The coordinator stops once every `HubHandle` has been dropped.
    pub fn spawn(capacity: usize, clock: Arc<dyn Clock>) -> (HubHandle, JoinHandle<()>) {
        let (commands, receiver) = mpsc::channel(capacity.max(1));
        let table = Arc::new(RwLock::new(RoutingTable::default()));
        let coordinator = Coordinator::new(receiver, table.clone(), clock);
        let task = tokio::spawn(coordinator.run());
        (HubHandle { commands, table }, task)
    }
}

/// Cloneable front of a running hub
#[derive(Clone)]
pub struct HubHandle {
    commands: mpsc::Sender<HubCommand>,
    table: Arc<RwLock<RoutingTable>>,
}

impl HubHandle {
    async fn submit(&self, command: HubCommand) -> Result<(), HubError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| HubError::Unavailable)
    }
}

#[async_trait]
impl SignalingHub for HubHandle {
    async fn register(&self, connection: ConnectionHandle) -> Result<(), HubError> {
        self.submit(HubCommand::Register(connection)).await
    }

    async fn unregister(&self, connection_id: ConnectionId) -> Result<(), HubError> {
        self.submit(HubCommand::Unregister(connection_id)).await
    }

    async fn dispatch(
        &self,
        sender: ConnectionId,
        message: SignalingMessage,
    ) -> Result<(), HubError> {
        self.submit(HubCommand::Dispatch { sender, message }).await
    }

    async fn participants(&self, meeting_id: &MeetingId) -> Vec<Participant> {
        self.table.read().await.participants(meeting_id)
    }
}
