//! Parsing of input lines into client commands.

use thiserror::Error;

pub const HELP: &str = "\
Commands:
  /join <room> [name]  join a room (optionally with a different name)
  /leave [room]        leave a room (default: the current one)
  /switch <room>       send subsequent messages to another joined room
  /rooms               list joined rooms
  /help                show this help
  /quit                disconnect and exit
Any other line is sent as a message to the current room.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join { room: String, name: Option<String> },
    Leave { room: Option<String> },
    Switch { room: String },
    Rooms,
    Help,
    Quit,
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '/{0}' (try /help)")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Not in a room; use /join <room> first")]
    NoCurrentRoom,

    #[error("Not a member of '{0}'")]
    NotJoined(String),
}

/// Parse one trimmed, non-empty input line.
pub fn parse_line(line: &str) -> Result<Command, CommandError> {
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Text(line.to_string()));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    match (name, args.as_slice()) {
        ("join", [room]) => Ok(Command::Join {
            room: room.to_string(),
            name: None,
        }),
        ("join", [room, display_name]) => Ok(Command::Join {
            room: room.to_string(),
            name: Some(display_name.to_string()),
        }),
        ("join", _) => Err(CommandError::Usage("/join <room> [name]")),
        ("leave", []) => Ok(Command::Leave { room: None }),
        ("leave", [room]) => Ok(Command::Leave {
            room: Some(room.to_string()),
        }),
        ("leave", _) => Err(CommandError::Usage("/leave [room]")),
        ("switch", [room]) => Ok(Command::Switch {
            room: room.to_string(),
        }),
        ("switch", _) => Err(CommandError::Usage("/switch <room>")),
        ("rooms", []) => Ok(Command::Rooms),
        ("help", _) => Ok(Command::Help),
        ("quit" | "exit", _) => Ok(Command::Quit),
        (other, _) => Err(CommandError::UnknownCommand(other.to_string())),
    }
}
