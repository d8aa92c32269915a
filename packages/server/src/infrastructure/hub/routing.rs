//! Routing table: three views over the same set of live connections.
//!
//! - `connections`: existence set, owns the handles
//! - `meetings`: membership grouped by meeting id
//! - `users`: the active connection of each user id
//!
//! Only the coordinator mutates a table. Every mutation keeps the views
//! consistent: a connection is a meeting member iff it exists, and a
//! meeting with no members has no entry at all.

use std::collections::{HashMap, HashSet};

use crate::domain::{ConnectionHandle, ConnectionId, MeetingId, Participant, UserId};

#[derive(Debug, Default)]
pub struct RoutingTable {
    connections: HashMap<ConnectionId, ConnectionHandle>,
    meetings: HashMap<MeetingId, HashSet<ConnectionId>>,
    users: HashMap<UserId, ConnectionId>,
}

impl RoutingTable {
    /// Insert into all three views.
    ///
    /// The caller must first remove any connection already registered for
    /// the same user id; otherwise the user entry is simply repointed.
    pub fn insert(&mut self, connection: ConnectionHandle) {
        let id = connection.id();
        self.users.insert(connection.user_id().clone(), id);
        self.meetings
            .entry(connection.meeting_id().clone())
            .or_default()
            .insert(id);
        self.connections.insert(id, connection);
    }

    /// Remove from all three views and hand the handle back.
    ///
    /// The user entry is only removed while it still points at `id`.
    pub fn remove(&mut self, id: ConnectionId) -> Option<ConnectionHandle> {
        let connection = self.connections.remove(&id)?;

        if self.users.get(connection.user_id()) == Some(&id) {
            self.users.remove(connection.user_id());
        }

        if let Some(members) = self.meetings.get_mut(connection.meeting_id()) {
            members.remove(&id);
            if members.is_empty() {
                self.meetings.remove(connection.meeting_id());
            }
        }

        Some(connection)
    }

    pub fn get(&self, id: ConnectionId) -> Option<&ConnectionHandle> {
        self.connections.get(&id)
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    /// The connection currently routed for `user_id`
    pub fn connection_for_user(&self, user_id: &UserId) -> Option<&ConnectionHandle> {
        self.users
            .get(user_id)
            .and_then(|id| self.connections.get(id))
    }

    /// Members of a meeting, in no particular order
    pub fn members(&self, meeting_id: &MeetingId) -> Vec<&ConnectionHandle> {
        self.meetings
            .get(meeting_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.connections.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Members of a meeting as participants, sorted by user id
    pub fn participants(&self, meeting_id: &MeetingId) -> Vec<Participant> {
        let mut participants: Vec<Participant> = self
            .members(meeting_id)
            .into_iter()
            .map(|c| c.participant().clone())
            .collect();
        participants.sort();
        participants
    }

    pub fn has_meeting(&self, meeting_id: &MeetingId) -> bool {
        self.meetings.contains_key(meeting_id)
    }

    pub fn meeting_count(&self) -> usize {
        self.meetings.len()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
