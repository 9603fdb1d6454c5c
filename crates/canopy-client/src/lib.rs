//! Canopy Client - per-endpoint streaming transport
//!
//! One `SurfaceClient` per server URL: performs the one-time agent card
//! discovery, sends messages over the streaming endpoint, and republishes
//! every server-pushed event as a local notification while collecting the
//! structured data payloads into the send result.

mod client;
mod config;
mod error;
mod transport;

pub use client::SurfaceClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use transport::{EventStream, HttpTransport, Transport};
