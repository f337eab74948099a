//! WebSocket message types: envelope, commands, and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{GuildId, MemberSnapshot, PreviousMember};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a server message stamped with the current time.
    #[must_use]
    pub fn new(id: String, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error message answering request `id`.
    #[must_use]
    pub fn error(id: String, code: u32, message: &str) -> Self {
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({ "code": code, "message": message }),
        )
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands that a client can send over WebSocket, carried in the
/// envelope's `payload`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Subscribe to member events for specific guilds.
    Subscribe {
        /// Guild IDs to subscribe to. Use `["*"]` for all guilds.
        guild_ids: Vec<String>,
        /// Optional event-name filter. Empty accepts every event.
        #[serde(default)]
        events: Vec<String>,
    },
    /// Unsubscribe from member events for specific guilds.
    Unsubscribe {
        /// Guild IDs to unsubscribe from. `["*"]` clears everything.
        guild_ids: Vec<String>,
    },
    /// Submit a member update for change detection.
    MemberUpdate {
        /// Member before the update.
        old: PreviousMember,
        /// Member after the update.
        new: MemberSnapshot,
    },
}

/// Splits raw guild ID strings into parsed IDs and the wildcard flag.
/// Unparseable entries are returned separately.
#[must_use]
pub fn parse_guild_ids(raw: &[String]) -> (Vec<GuildId>, bool, Vec<String>) {
    let mut ids = Vec::new();
    let mut wildcard = false;
    let mut invalid = Vec::new();
    for s in raw {
        if s == "*" {
            wildcard = true;
        } else if let Ok(id) = s.parse::<GuildId>() {
            ids.push(id);
        } else {
            invalid.push(s.clone());
        }
    }
    (ids, wildcard, invalid)
}
