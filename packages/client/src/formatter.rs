//! Message formatting utilities for client display.

use roomcast_server::domain::ServerEvent;
use roomcast_shared::time::format_local_time;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format an event received from the server
    ///
    /// # Arguments
    ///
    /// * `event` - The decoded server event
    /// * `received_at` - Unix timestamp when the frame arrived (milliseconds)
    pub fn format_server_event(event: &ServerEvent, received_at: i64) -> String {
        let time = format_local_time(received_at);
        match event {
            ServerEvent::JoinAccepted { room_name } => {
                format!("\n[{}] * joined '{}'\n", time, room_name)
            }
            ServerEvent::LeaveAccepted { room_name } => {
                format!("\n[{}] * left '{}'\n", time, room_name)
            }
            ServerEvent::RoomMembers { room_name, names } => Self::format_members(room_name, names),
            ServerEvent::TextBroadcast {
                room_name,
                sender_name,
                body,
            } => format!("\n[{}] [{}] {}: {}\n", time, room_name, sender_name, body),
            ServerEvent::Rejected { reason, detail } => match detail {
                Some(detail) => format!("\n[{}] ! rejected: {} ({})\n", time, reason, detail),
                None => format!("\n[{}] ! rejected: {}\n", time, reason),
            },
        }
    }

    /// Format a room roster
    pub fn format_members(room_name: &str, names: &[String]) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str(&format!("Members of '{}' ({}):\n", room_name, names.len()));
        if names.is_empty() {
            output.push_str("(No members)\n");
        } else {
            for name in names {
                output.push_str(&format!("  {}\n", name));
            }
        }
        output.push_str("============================================================\n");
        output
    }

    /// Format a frame that could not be decoded
    pub fn format_raw_message(text: &str) -> String {
        format!("\n(unrecognized frame) {}\n", text)
    }

    /// Format a local notice (command output or usage error)
    pub fn format_notice(text: &str) -> String {
        format!("\n{}\n", text)
    }
}
