//! Event bus
//!
//! Broadcast channel shared by every panel subscribed to the router. Each
//! event carries the originating server URL so subscribers can discard
//! events not addressed to them.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use canopy_protocol::StreamEvent;

/// An event republished by the router
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RouterEvent {
    /// A message is about to be sent; published before the network
    /// operation begins so panels can start latency timers
    MessageSent {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        /// Epoch milliseconds at send entry
        timestamp: i64,
    },
    /// A streaming event arrived from one endpoint
    Streaming { url: String, event: StreamEvent },
}

impl RouterEvent {
    /// The server URL this event originated from
    pub fn url(&self) -> &str {
        match self {
            RouterEvent::MessageSent { url, .. } => url,
            RouterEvent::Streaming { url, .. } => url,
        }
    }
}

/// Bus error type
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("Send error: {0}")]
    Send(#[from] broadcast::error::SendError<RouterEvent>),
}

/// Broadcast bus for router events
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RouterEvent>,
}

impl EventBus {
    /// Create a bus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to every subscriber
    pub fn publish(&self, event: RouterEvent) -> Result<usize, BusError> {
        self.sender.send(event).map_err(BusError::from)
    }

    /// Subscribe to the bus
    pub fn subscribe(&self) -> broadcast::Receiver<RouterEvent> {
        self.sender.subscribe()
    }

    /// Current number of subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent_event(url: &str) -> RouterEvent {
        RouterEvent::MessageSent {
            url: url.to_string(),
            text: Some("hello".to_string()),
            timestamp: 1_700_000_000_000,
        }
    }

    #[tokio::test]
    async fn test_bus_publish_subscribe() {
        let bus = EventBus::new(100);
        let mut rx = bus.subscribe();

        bus.publish(sent_event("http://host/a")).unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.url(), "http://host/a");
    }

    #[tokio::test]
    async fn test_bus_multiple_subscribers() {
        let bus = EventBus::new(100);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(sent_event("http://host/a")).unwrap();

        assert_eq!(rx1.recv().await.unwrap().url(), "http://host/a");
        assert_eq!(rx2.recv().await.unwrap().url(), "http://host/a");
    }

    #[test]
    fn test_publish_without_subscribers_is_an_error() {
        let bus = EventBus::new(100);
        assert!(bus.publish(sent_event("http://host/a")).is_err());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_message_sent_serializes_tag() {
        let value = serde_json::to_value(sent_event("http://host/a")).unwrap();
        assert_eq!(value["event_type"], "message_sent");
        assert_eq!(value["url"], "http://host/a");
        assert_eq!(value["text"], "hello");
    }
}
