/**
 * Real-time Socket Envelope
 *
 * Frames exchanged on the `/socket` relay. Clients send
 * `{"event":"sendMessage","payload":...}` and every connected socket receives
 * the payload back as `{"event":"receiveMessage","payload":...,"timestamp":...}`.
 */
use serde::{Deserialize, Serialize};

/// Name of a socket event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    /// Client to server chat frame
    SendMessage,
    /// Server to client rebroadcast
    ReceiveMessage,
    /// Any other event name
    #[serde(untagged)]
    Custom(String),
}

/// Frame sent by a client
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientFrame {
    pub event: EventType,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Event broadcast to all connected sockets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeEvent {
    /// Type of event
    pub event: EventType,
    /// Event payload, relayed untouched
    pub payload: serde_json::Value,
    /// RFC 3339 time the server relayed the event
    pub timestamp: String,
}

impl RealtimeEvent {
    /// Create a new real-time event
    pub fn new(event: EventType, payload: serde_json::Value) -> Self {
        Self {
            event,
            payload,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Rebroadcast of a chat payload
    pub fn receive_message(payload: serde_json::Value) -> Self {
        Self::new(EventType::ReceiveMessage, payload)
    }

    /// Turn a raw client text frame into the event to rebroadcast
    ///
    /// A `sendMessage` frame relays its payload. Any other JSON is relayed
    /// whole, and non-JSON text is relayed as a string.
    pub fn from_client_text(text: &str) -> Self {
        if let Ok(frame) = serde_json::from_str::<ClientFrame>(text) {
            if frame.event == EventType::SendMessage {
                return Self::receive_message(frame.payload);
            }
        }
        let payload = serde_json::from_str::<serde_json::Value>(text)
            .unwrap_or_else(|_| serde_json::Value::String(text.to_string()));
        Self::receive_message(payload)
    }
}
