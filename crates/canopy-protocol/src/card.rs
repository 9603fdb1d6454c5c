//! Agent card discovery metadata
//!
//! Fetched once per transport client lifetime from the well-known URL.

use serde::{Deserialize, Serialize};

/// Path of the discovery document relative to the server base URL
pub const WELL_KNOWN_CARD_PATH: &str = "/.well-known/agent-card.json";

/// Capability metadata published by a server endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Canonical URL the card was served for
    pub url: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub capabilities: AgentCapabilities,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    #[serde(default)]
    pub streaming: bool,
}

impl AgentCard {
    /// Build the discovery URL for a server base URL
    pub fn card_url(base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), WELL_KNOWN_CARD_PATH)
    }
}
