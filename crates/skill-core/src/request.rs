//! Inbound request types.
//!
//! The transport layer hands the dispatcher an already-parsed envelope; these
//! types mirror the platform's camelCase JSON so serde does that parsing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Request envelope as delivered by the assistant platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default = "default_version")]
    pub version: String,
    pub session: Session,
    pub request: Event,
    /// Device/system context. Opaque to the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Lifecycle phase of an incoming event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    SessionStarted,
    Launch,
    Intent,
    SessionEnded,
}

impl EventKind {
    /// Wire name of the request type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionStarted => "SessionStartedRequest",
            Self::Launch => "LaunchRequest",
            Self::Intent => "IntentRequest",
            Self::SessionEnded => "SessionEndedRequest",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incoming lifecycle or intent event, tagged by `type` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "SessionStartedRequest")]
    SessionStarted(SessionStartedRequest),
    #[serde(rename = "LaunchRequest")]
    Launch(LaunchRequest),
    #[serde(rename = "IntentRequest")]
    Intent(IntentRequest),
    #[serde(rename = "SessionEndedRequest")]
    SessionEnded(SessionEndedRequest),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::SessionStarted(_) => EventKind::SessionStarted,
            Self::Launch(_) => EventKind::Launch,
            Self::Intent(_) => EventKind::Intent,
            Self::SessionEnded(_) => EventKind::SessionEnded,
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            Self::SessionStarted(r) => &r.request_id,
            Self::Launch(r) => &r.request_id,
            Self::Intent(r) => &r.request_id,
            Self::SessionEnded(r) => &r.request_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::SessionStarted(r) => r.timestamp,
            Self::Launch(r) => r.timestamp,
            Self::Intent(r) => r.timestamp,
            Self::SessionEnded(r) => r.timestamp,
        }
    }
}

/// Sent when a new session begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStartedRequest {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Sent when the user invokes the skill without naming an intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Sent when the upstream NLU resolved the utterance to a named intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub intent: Intent,
}

impl IntentRequest {
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.intent.slot_value(name)
    }
}

/// A resolved intent with its slot values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// Case-sensitive; must match the interaction model exactly.
    pub name: String,
    #[serde(default)]
    pub slots: BTreeMap<String, Slot>,
}

impl Intent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: BTreeMap::new(),
        }
    }

    /// Add a filled slot.
    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.slots.insert(
            name.clone(),
            Slot {
                name,
                value: Some(value.into()),
            },
        );
        self
    }

    /// Value of a slot, if the slot exists and was filled.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots.get(name).and_then(|s| s.value.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Sent when the session closes. The platform ignores any response to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// e.g. `USER_INITIATED`, `ERROR`, `EXCEEDED_MAX_REPROMPTS`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
