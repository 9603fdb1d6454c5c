//! Canopy Protocol - wire types for the surface streaming protocol
//!
//! Shared by the transport client and the router: outbound messages,
//! server-pushed stream events, and agent discovery metadata.

mod card;
mod event;
mod message;

pub use card::{AgentCapabilities, AgentCard, WELL_KNOWN_CARD_PATH};
pub use event::{Artifact, EventMessage, Part, StreamEvent, TaskState, TaskStatus};
pub use message::{OutboundMessage, UiAction};
