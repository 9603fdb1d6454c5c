//! Stream events
//!
//! One discrete unit pushed by the backend over the course of a single
//! send's response stream. Status updates may carry message parts; data
//! parts are what the client accumulates into the send result.

use serde::{Deserialize, Serialize};

/// A server-pushed event on a message stream
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StreamEvent {
    /// Task status changed; may carry message parts
    #[serde(rename_all = "camelCase")]
    StatusUpdate {
        #[serde(default)]
        task_id: Option<String>,
        status: TaskStatus,
        /// Marks the last event of the stream
        #[serde(default, rename = "final")]
        is_final: bool,
    },
    /// Task produced an artifact
    #[serde(rename_all = "camelCase")]
    ArtifactUpdate {
        #[serde(default)]
        task_id: Option<String>,
        artifact: Artifact,
    },
}

impl StreamEvent {
    /// Whether this event closes the stream
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            StreamEvent::StatusUpdate { is_final: true, .. }
        )
    }

    /// Structured data payloads carried by this event, in declaration order
    pub fn data_parts(&self) -> Vec<serde_json::Value> {
        let parts = match self {
            StreamEvent::StatusUpdate { status, .. } => {
                status.message.as_ref().map(|m| m.parts.as_slice())
            }
            StreamEvent::ArtifactUpdate { artifact, .. } => Some(artifact.parts.as_slice()),
        };

        parts
            .unwrap_or_default()
            .iter()
            .filter_map(|part| match part {
                Part::Data { data, .. } => Some(data.clone()),
                Part::Text { .. } => None,
            })
            .collect()
    }
}

/// Task lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    Completed,
    Failed,
    Canceled,
}

/// Status carried by a status-update event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub state: TaskState,
    /// Optional message attached to the status change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<EventMessage>,
}

/// Message attached to a status update or artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Artifact produced by the backend task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(default)]
    pub artifact_id: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a message: plain status text or a structured data payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Part {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Data {
        data: serde_json::Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
}
