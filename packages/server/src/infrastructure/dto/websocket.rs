//! WebSocket frame DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A frame as sent by a client.
///
/// Only `type`, `data` and `to` are read. Identity fields a client may
/// include (`from`, `meeting_id`, `timestamp`) are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InboundSignal {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, alias = "payload")]
    pub data: Option<Map<String, Value>>,
    /// Missing, `null` or `""` all mean broadcast
    #[serde(default)]
    pub to: Option<String>,
}

/// A frame as delivered to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Map<String, Value>,
    pub from: String,
    /// `""` for broadcasts
    pub to: String,
    pub meeting_id: String,
    /// RFC 3339, UTC
    pub timestamp: String,
}
