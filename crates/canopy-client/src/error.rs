use thiserror::Error;

/// Unified error type for transport operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Discovery/handshake with the server failed; no events were emitted
    #[error("connection error: {0}")]
    Connection(String),

    /// The response stream was interrupted before the final event
    #[error("stream error: {0}")]
    Stream(String),

    /// The server answered, but the payload did not parse
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Non-success HTTP status on the streaming send
    #[error("http error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Invalid client configuration
    #[error("config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Protocol(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
