use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

fn default_extension() -> String {
    "https://a2ui.org/a2a-extension/a2ui/v0.8".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

/// Transport client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the server endpoint
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(with = "serde_duration", default = "default_timeout")]
    pub timeout: Duration,
    /// Surface protocol extension announced on every request
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Additional headers to include
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ClientConfig {
    /// Create a config for a server endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: default_timeout(),
            extension: default_extension(),
            headers: HashMap::new(),
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the protocol extension announced to the server
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Same settings against a different endpoint
    pub fn for_url(&self, base_url: impl Into<String>) -> Self {
        let mut config = self.clone();
        config.base_url = base_url.into();
        config
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:10002")
    }
}

// Custom serialization for Duration
mod serde_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("http://host:10002");
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert!(config.extension.contains("a2ui"));
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_for_url_keeps_settings() {
        let config = ClientConfig::new("http://host/a")
            .with_timeout(Duration::from_secs(5))
            .with_header("x-tenant", "demo");
        let other = config.for_url("http://host/b");
        assert_eq!(other.base_url, "http://host/b");
        assert_eq!(other.timeout, Duration::from_secs(5));
        assert_eq!(other.headers.get("x-tenant").unwrap(), "demo");
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{ "base_url": "http://host:10002" }"#).unwrap();
        assert_eq!(config.base_url, "http://host:10002");
        assert_eq!(config.timeout, Duration::from_secs(120));
    }
}
