//! Outbound messages
//!
//! What a panel hands to the router: either free text typed by the user or
//! a structured action raised by a rendered component.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A single logical message bound for one server endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    /// Free text typed by the user
    Text(String),
    /// Structured action raised by a rendered component
    Action(UiAction),
}

impl OutboundMessage {
    /// The text content, if this is a text message
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OutboundMessage::Text(text) => Some(text),
            OutboundMessage::Action(_) => None,
        }
    }
}

impl From<String> for OutboundMessage {
    fn from(text: String) -> Self {
        OutboundMessage::Text(text)
    }
}

impl From<&str> for OutboundMessage {
    fn from(text: &str) -> Self {
        OutboundMessage::Text(text.to_string())
    }
}

impl From<UiAction> for OutboundMessage {
    fn from(action: UiAction) -> Self {
        OutboundMessage::Action(action)
    }
}

/// A structured action payload raised by a component on a surface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiAction {
    /// Action name as declared by the surface definition
    pub name: String,
    /// Surface the action originated from
    pub surface_id: String,
    /// Component the action originated from
    pub source_component_id: String,
    /// Epoch milliseconds at the moment the action was raised
    pub timestamp: i64,
    /// Action-specific context captured from the surface data model
    #[serde(default)]
    pub context: serde_json::Value,
}

impl UiAction {
    /// Create an action stamped with the current time
    pub fn new(
        name: impl Into<String>,
        surface_id: impl Into<String>,
        source_component_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            surface_id: surface_id.into(),
            source_component_id: source_component_id.into(),
            timestamp: Utc::now().timestamp_millis(),
            context: serde_json::Value::Null,
        }
    }

    /// Attach context captured from the surface data model
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }
}
