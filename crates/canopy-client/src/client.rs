//! Surface client
//!
//! One instance per server URL. The agent card is fetched on the first send
//! and memoized for the lifetime of the client; every event arriving on a
//! send's response stream is broadcast to local subscribers before the next
//! event is awaited.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::{broadcast, OnceCell};
use tracing::debug;

use canopy_protocol::{AgentCard, OutboundMessage, StreamEvent};

use crate::error::Result;
use crate::transport::Transport;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Per-endpoint transport client
pub struct SurfaceClient {
    server_url: String,
    transport: Arc<dyn Transport>,
    card: OnceCell<AgentCard>,
    events: broadcast::Sender<StreamEvent>,
}

impl SurfaceClient {
    /// Create a client for one server endpoint
    pub fn new(server_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            server_url: server_url.into(),
            transport,
            card: OnceCell::new(),
            events,
        }
    }

    /// The server URL this client is bound to
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Subscribe to the events of every send made through this client
    pub fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.events.subscribe()
    }

    /// The memoized agent card, if the handshake has completed
    pub fn card(&self) -> Option<&AgentCard> {
        self.card.get()
    }

    /// Probe whether the endpoint is reachable
    pub async fn health_check(&self) -> bool {
        self.transport.health_check().await
    }

    /// Fetch the agent card on first use; reused for every later send
    async fn ensure_connected(&self) -> Result<&AgentCard> {
        self.card
            .get_or_try_init(|| async {
                debug!("Connecting to {}", self.server_url);
                self.transport.fetch_card().await
            })
            .await
    }

    /// Send one message and collect the structured data payloads of its
    /// response stream, in arrival order.
    ///
    /// Each arriving event is broadcast to subscribers before the next one
    /// is awaited, so status can be observed incrementally. If the stream
    /// fails mid-flight, payloads collected so far are discarded and the
    /// error is returned; there is no retry.
    pub async fn send(
        &self,
        message: &OutboundMessage,
        session_id: Option<&str>,
    ) -> Result<Vec<serde_json::Value>> {
        self.ensure_connected().await?;

        let mut stream = self.transport.open_stream(message, session_id).await?;
        let mut payloads = Vec::new();

        while let Some(item) = stream.next().await {
            let event = item?;
            // No subscribers is fine; panels listen only while mounted.
            let _ = self.events.send(event.clone());
            payloads.extend(event.data_parts());
        }

        debug!(
            "Stream from {} completed with {} data payloads",
            self.server_url,
            payloads.len()
        );
        Ok(payloads)
    }
}

impl std::fmt::Debug for SurfaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceClient")
            .field("server_url", &self.server_url)
            .field("connected", &self.card.get().is_some())
            .finish()
    }
}
