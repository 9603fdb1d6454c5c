//! Example: wiring panels to a shared router
//!
//! One router serves every panel; each panel subscribes to the bus and
//! filters events by the server URL it talks to.

use canopy_client::ClientConfig;
use canopy_router::{RouterEvent, SurfaceRouter};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let chat_url = "http://localhost:10002";
    let agent_url = "http://localhost:10003";

    let config = ClientConfig::default().with_timeout(Duration::from_secs(30));
    let router = SurfaceRouter::with_config(config);

    // A panel subscribes once and filters by the endpoint it renders.
    let mut events = router.subscribe();
    let panel_url = chat_url.to_string();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if event.url() != panel_url {
                continue;
            }
            match event {
                RouterEvent::MessageSent { timestamp, .. } => {
                    println!("chat panel: send started at {}", timestamp);
                }
                RouterEvent::Streaming { event, .. } => {
                    println!("chat panel: {} data payloads", event.data_parts().len());
                }
            }
        }
    });

    // Sessions are per endpoint and stable across sends.
    println!("chat session: {}", router.session_id(chat_url));
    println!("agent session: {}", router.session_id(agent_url));

    let payloads = router
        .send_text_message(chat_url, "show me last week's outages")
        .await?;
    println!("received {} surface payloads", payloads.len());

    // Starting a fresh conversation replaces only this endpoint's session.
    let fresh = router.reset_session(chat_url);
    println!("new chat session: {}", fresh);

    router.cleanup(agent_url);
    println!("active servers: {:?}", router.active_servers());

    Ok(())
}
