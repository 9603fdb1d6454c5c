//! Transport layer
//!
//! The `Transport` trait is the seam between the surface client and the
//! wire: the HTTP implementation fetches the agent card from the well-known
//! URL and consumes the streaming send endpoint as SSE. Tests substitute a
//! mock transport behind the same trait.

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::{future, Stream, StreamExt};
use reqwest::{header, Client};
use serde_json::json;
use std::pin::Pin;
use tracing::debug;
use uuid::Uuid;

use canopy_protocol::{AgentCard, OutboundMessage, StreamEvent};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Mime type of structured surface payloads on the wire
pub const A2UI_MIME_TYPE: &str = "application/json+a2ui";

/// Type alias for the server-to-client event stream of one send
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// Wire access for one server endpoint
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the discovery card from the well-known URL
    async fn fetch_card(&self) -> Result<AgentCard>;

    /// Send one message and open its response stream
    async fn open_stream(
        &self,
        message: &OutboundMessage,
        session_id: Option<&str>,
    ) -> Result<EventStream>;

    /// Probe whether the endpoint is reachable
    async fn health_check(&self) -> bool;
}

/// HTTP/SSE transport against one server endpoint
pub struct HttpTransport {
    config: ClientConfig,
    http: Client,
}

impl HttpTransport {
    /// Create a transport from a config
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self { config, http })
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/v1/message:stream",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Build request headers
    fn build_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::HeaderName::from_static("x-a2a-extensions"),
            header::HeaderValue::from_str(&self.config.extension)
                .map_err(|e| ClientError::Config(format!("Invalid extension value: {}", e)))?,
        );

        for (key, value) in &self.config.headers {
            let name = header::HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| ClientError::Config(format!("Invalid header name: {}", e)))?;
            let val = header::HeaderValue::from_str(value)
                .map_err(|e| ClientError::Config(format!("Invalid header value: {}", e)))?;
            headers.insert(name, val);
        }

        Ok(headers)
    }

    /// Wrap the outbound message in the wire envelope
    fn build_envelope(message: &OutboundMessage, session_id: Option<&str>) -> serde_json::Value {
        let part = match message {
            OutboundMessage::Text(text) => json!({ "kind": "text", "text": text }),
            OutboundMessage::Action(action) => json!({
                "kind": "data",
                "data": action,
                "mimeType": A2UI_MIME_TYPE,
            }),
        };

        let mut envelope = json!({
            "message": {
                "messageId": Uuid::new_v4().to_string(),
                "kind": "message",
                "role": "user",
                "parts": [part],
            }
        });
        if let Some(sid) = session_id {
            envelope["message"]["contextId"] = json!(sid);
        }
        envelope
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_card(&self) -> Result<AgentCard> {
        let url = AgentCard::card_url(&self.config.base_url);
        debug!("Fetching agent card from {}", url);

        let response = self
            .http
            .get(&url)
            .headers(self.build_headers()?)
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Connection(format!(
                "agent card request failed with status {}",
                status
            )));
        }

        response
            .json::<AgentCard>()
            .await
            .map_err(|e| ClientError::Connection(format!("malformed agent card: {}", e)))
    }

    async fn open_stream(
        &self,
        message: &OutboundMessage,
        session_id: Option<&str>,
    ) -> Result<EventStream> {
        let envelope = Self::build_envelope(message, session_id);

        let response = self
            .http
            .post(self.stream_url())
            .headers(self.build_headers()?)
            .header(header::ACCEPT, "text/event-stream")
            .json(&envelope)
            .send()
            .await
            .map_err(|e| ClientError::Stream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        // Decode SSE frames into stream events; the stream ends after the
        // event flagged final, or at the first transport/decoding error.
        let stream = response
            .bytes_stream()
            .eventsource()
            .map(|frame| match frame {
                Ok(frame) => serde_json::from_str::<StreamEvent>(&frame.data)
                    .map_err(|e| ClientError::Protocol(format!("bad stream event: {}", e))),
                Err(e) => Err(ClientError::Stream(e.to_string())),
            })
            .scan(false, |done, item| {
                if *done {
                    return future::ready(None);
                }
                *done = match &item {
                    Ok(event) => event.is_final(),
                    Err(_) => true,
                };
                future::ready(Some(item))
            });

        Ok(Box::pin(stream))
    }

    async fn health_check(&self) -> bool {
        let url = AgentCard::card_url(&self.config.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
