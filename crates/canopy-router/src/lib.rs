//! Canopy Router - process-wide multiplexer for surface endpoints
//!
//! One router serves every panel in the shell: it owns the per-endpoint
//! transport clients, the per-endpoint session identifiers, and a broadcast
//! bus on which every client event is republished tagged with its
//! originating server URL so panels can filter by origin.

mod bus;
mod router;
mod session;

pub use bus::{BusError, EventBus, RouterEvent};
pub use router::{SurfaceRouter, TransportFactory};
pub use session::SessionRegistry;
