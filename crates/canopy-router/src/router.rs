//! Surface router
//!
//! Single point of access for every panel: resolves the transport client
//! and session for a server URL, delegates the send, and republishes every
//! client event on the shared bus tagged with its originating URL.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use canopy_client::{ClientConfig, HttpTransport, Result, SurfaceClient, Transport};
use canopy_protocol::{OutboundMessage, UiAction};

use crate::bus::{EventBus, RouterEvent};
use crate::session::SessionRegistry;

/// Builds a transport for a server URL; swapped out for mocks in tests
pub type TransportFactory = Arc<dyn Fn(&str) -> Result<Arc<dyn Transport>> + Send + Sync>;

/// Process-wide multiplexer over per-endpoint surface clients
///
/// Concurrent sends to the same URL share one client and run concurrently;
/// their events may interleave on the bus. Events for different URLs carry
/// distinct tags, so subscribers filter by the URL they care about.
pub struct SurfaceRouter {
    clients: DashMap<String, Arc<SurfaceClient>>,
    sessions: SessionRegistry,
    bus: EventBus,
    transport_factory: TransportFactory,
}

impl SurfaceRouter {
    /// Create a router with default HTTP transport settings
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a router whose clients inherit settings from a config template
    pub fn with_config(template: ClientConfig) -> Self {
        let factory: TransportFactory = Arc::new(move |url: &str| {
            let transport = HttpTransport::new(template.for_url(url))?;
            Ok(Arc::new(transport) as Arc<dyn Transport>)
        });
        Self::with_transport_factory(factory)
    }

    /// Create a router with a custom transport factory
    pub fn with_transport_factory(transport_factory: TransportFactory) -> Self {
        Self {
            clients: DashMap::new(),
            sessions: SessionRegistry::new(),
            bus: EventBus::default(),
            transport_factory,
        }
    }

    /// Subscribe to every event the router republishes
    pub fn subscribe(&self) -> broadcast::Receiver<RouterEvent> {
        self.bus.subscribe()
    }

    /// Send a text message to a server endpoint
    ///
    /// The message-sent notification is published before the network
    /// operation begins; the session for the URL is attached to the send.
    pub async fn send_text_message(
        &self,
        url: &str,
        text: impl Into<String>,
    ) -> Result<Vec<serde_json::Value>> {
        let text = text.into();
        let _ = self.bus.publish(RouterEvent::MessageSent {
            url: url.to_string(),
            text: Some(text.clone()),
            timestamp: Utc::now().timestamp_millis(),
        });
        self.dispatch(url, OutboundMessage::Text(text)).await
    }

    /// Send a structured action payload to a server endpoint
    pub async fn send_action_message(
        &self,
        url: &str,
        action: UiAction,
    ) -> Result<Vec<serde_json::Value>> {
        let _ = self.bus.publish(RouterEvent::MessageSent {
            url: url.to_string(),
            text: None,
            timestamp: Utc::now().timestamp_millis(),
        });
        self.dispatch(url, OutboundMessage::Action(action)).await
    }

    /// The session identifier for a URL, created on first lookup
    pub fn session_id(&self, url: &str) -> String {
        self.sessions.get_or_create(url)
    }

    /// Start a fresh conversation against a URL
    pub fn reset_session(&self, url: &str) -> String {
        self.sessions.reset(url)
    }

    /// Clear every session; clients stay registered
    pub fn reset_all_sessions(&self) {
        self.sessions.reset_all();
    }

    /// Every endpoint contacted since the last cleanup
    pub fn active_servers(&self) -> Vec<String> {
        self.clients
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Drop the client and session for a URL
    ///
    /// An in-flight send on the dropped client keeps running until it
    /// completes or errors on its own; its stream is not terminated.
    pub fn cleanup(&self, url: &str) {
        debug!("Cleaning up {}", url);
        self.clients.remove(url);
        self.sessions.remove(url);
    }

    /// Current number of bus subscribers
    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }

    /// Resolve the client for a URL, creating it and its event forwarder on
    /// first contact
    fn client(&self, url: &str) -> Result<Arc<SurfaceClient>> {
        if let Some(client) = self.clients.get(url) {
            return Ok(Arc::clone(client.value()));
        }

        let entry = self
            .clients
            .entry(url.to_string())
            .or_try_insert_with(|| {
                debug!("Creating client for {}", url);
                let transport = (self.transport_factory)(url)?;
                let client = Arc::new(SurfaceClient::new(url, transport));
                self.spawn_forwarder(url, &client);
                Ok::<_, canopy_client::ClientError>(Arc::clone(&client))
            })?;
        Ok(Arc::clone(entry.value()))
    }

    /// Republish one client's events on the bus, tagged with its URL
    fn spawn_forwarder(&self, url: &str, client: &Arc<SurfaceClient>) {
        let mut rx = client.subscribe();
        let bus = self.bus.clone();
        let url = url.to_string();

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        let _ = bus.publish(RouterEvent::Streaming {
                            url: url.clone(),
                            event,
                        });
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Forwarder for {} lagged, {} events dropped", url, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            debug!("Forwarder for {} stopped", url);
        });
    }

    async fn dispatch(
        &self,
        url: &str,
        message: OutboundMessage,
    ) -> Result<Vec<serde_json::Value>> {
        let client = self.client(url)?;
        let session_id = self.sessions.get_or_create(url);
        client.send(&message, Some(&session_id)).await
    }
}

impl Default for SurfaceRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SurfaceRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceRouter")
            .field("clients", &self.clients.len())
            .field("sessions", &self.sessions.len())
            .field("subscribers", &self.bus.subscriber_count())
            .finish()
    }
}
