//! Domain logic for client-side operations.
//!
//! This module contains pure functions and state transitions without side
//! effects, making them easy to test. Nothing here touches the network.

use std::collections::{BTreeMap, BTreeSet};

use roomcast_server::domain::{ClientEvent, ServerEvent};

use crate::{
    command::{Command, CommandError},
    error::ClientError,
};

/// What the session should do in response to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send this event to the server.
    Send(ClientEvent),
    /// Print this text locally.
    Print(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingJoin {
    name: String,
    /// Make the room current once the server accepts the join.
    focus: bool,
}

/// Client view of its room memberships.
///
/// Survives reconnects: after a new connection is established
/// [`SessionState::on_connected`] produces the joins needed to restore it.
#[derive(Debug, Clone)]
pub struct SessionState {
    default_name: String,
    /// Joined rooms and the name used in each
    joined: BTreeMap<String, String>,
    pending: BTreeMap<String, PendingJoin>,
    current: Option<String>,
    initial_room: Option<String>,
    /// Rejoins sent by the last `on_connected` that the server has not
    /// acknowledged yet
    awaiting_rejoin: BTreeSet<String>,
    /// Whether the server acknowledged any join on the current connection
    join_acknowledged: bool,
}

impl SessionState {
    pub fn new(default_name: impl Into<String>, initial_room: Option<String>) -> Self {
        Self {
            default_name: default_name.into(),
            joined: BTreeMap::new(),
            pending: BTreeMap::new(),
            current: None,
            initial_room,
            awaiting_rejoin: BTreeSet::new(),
            join_acknowledged: false,
        }
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn current_room(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn joined_rooms(&self) -> Vec<&str> {
        self.joined.keys().map(String::as_str).collect()
    }

    /// Joins to send right after a connection is established: every room
    /// joined (or still being joined) when the previous connection dropped,
    /// plus the room given on the command line the first time.
    pub fn on_connected(&mut self) -> Vec<ClientEvent> {
        let mut events = Vec::new();
        let unanswered = std::mem::take(&mut self.pending);

        for (room, name) in std::mem::take(&mut self.joined) {
            events.push(self.request_join(room, name, false));
        }
        for (room, pending) in unanswered {
            if !self.pending.contains_key(&room) {
                events.push(self.request_join(room, pending.name, pending.focus));
            }
        }
        if let Some(room) = self.initial_room.take()
            && !self.pending.contains_key(&room)
        {
            let name = self.default_name.clone();
            events.push(self.request_join(room, name, true));
        }

        self.awaiting_rejoin = self.pending.keys().cloned().collect();
        self.join_acknowledged = false;
        events
    }

    /// Whether the current connection is known to work: the server has
    /// acknowledged at least one join on it, including every rejoin sent
    /// when it was established.
    pub fn is_restored(&self) -> bool {
        self.join_acknowledged && self.awaiting_rejoin.is_empty()
    }

    /// Turn a parsed command into an action, updating local state where
    /// the command is purely local.
    pub fn handle_command(&mut self, command: Command) -> Result<Action, CommandError> {
        match command {
            Command::Join { room, name } => {
                let name = name.unwrap_or_else(|| self.default_name.clone());
                Ok(Action::Send(self.request_join(room, name, true)))
            }
            Command::Leave { room } => {
                let room = match room {
                    Some(room) => room,
                    None => self.current.clone().ok_or(CommandError::NoCurrentRoom)?,
                };
                Ok(Action::Send(ClientEvent::LeaveRoom { room_name: room }))
            }
            Command::Switch { room } => {
                if !self.joined.contains_key(&room) {
                    return Err(CommandError::NotJoined(room));
                }
                self.current = Some(room.clone());
                Ok(Action::Print(format!("Now talking in '{}'", room)))
            }
            Command::Rooms => Ok(Action::Print(self.describe_rooms())),
            Command::Help => Ok(Action::Print(crate::command::HELP.to_string())),
            Command::Quit => Ok(Action::Quit),
            Command::Text(body) => {
                let room = self.current.clone().ok_or(CommandError::NoCurrentRoom)?;
                Ok(Action::Send(ClientEvent::Text {
                    room_name: room,
                    body,
                }))
            }
        }
    }

    /// Track membership changes acknowledged by the server.
    pub fn apply(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::JoinAccepted { room_name } => {
                let pending = self.pending.remove(room_name);
                self.awaiting_rejoin.remove(room_name);
                self.join_acknowledged = true;
                let focus = pending.as_ref().is_some_and(|p| p.focus);
                let name = pending
                    .map(|p| p.name)
                    .unwrap_or_else(|| self.default_name.clone());
                // An idempotent re-join keeps the name already on record.
                self.joined.entry(room_name.clone()).or_insert(name);
                if focus || self.current.is_none() {
                    self.current = Some(room_name.clone());
                }
            }
            ServerEvent::LeaveAccepted { room_name } => {
                self.joined.remove(room_name);
                if self.current.as_deref() == Some(room_name.as_str()) {
                    self.current = self.joined.keys().next().cloned();
                }
            }
            ServerEvent::RoomMembers { .. }
            | ServerEvent::TextBroadcast { .. }
            | ServerEvent::Rejected { .. } => {}
        }
    }

    fn request_join(&mut self, room: String, name: String, focus: bool) -> ClientEvent {
        self.pending.insert(
            room.clone(),
            PendingJoin {
                name: name.clone(),
                focus,
            },
        );
        ClientEvent::JoinRoom {
            room_name: room,
            client_name: name,
        }
    }

    fn describe_rooms(&self) -> String {
        if self.joined.is_empty() {
            return "(not in any room)".to_string();
        }
        self.joined
            .iter()
            .map(|(room, name)| {
                let marker = if self.current.as_ref() == Some(room) { "*" } else { " " };
                format!("{} {} as '{}'", marker, room, name)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Check if the client should exit immediately based on the error type.
///
/// # Returns
///
/// `true` if retrying cannot help (the URL or endpoint is wrong),
/// `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::InvalidUrl(_) | ClientError::EndpointNotFound(_)
    )
}

/// Check if a lost connection should restart the reconnection count.
///
/// Only a connection the server actually served counts. A server that
/// accepts and then drops every connection keeps using up attempts.
pub fn should_reset_reconnect_count(error: &ClientError, state: &SessionState) -> bool {
    *error == ClientError::ConnectionLost && state.is_restored()
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}
