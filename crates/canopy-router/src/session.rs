//! Session registry
//!
//! One session identifier per server URL, attached to outbound messages so
//! the backend can correlate turns of the same conversation. Identifiers
//! are stable until explicitly reset or removed.

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

/// Maps server URLs to their active session identifier
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, String>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Return the session for a URL, creating one on first lookup
    pub fn get_or_create(&self, url: &str) -> String {
        self.sessions
            .entry(url.to_string())
            .or_insert_with(|| Uuid::new_v4().to_string())
            .clone()
    }

    /// Replace the session for a URL with a fresh identifier
    pub fn reset(&self, url: &str) -> String {
        let session_id = Uuid::new_v4().to_string();
        debug!("Session reset for {}", url);
        self.sessions.insert(url.to_string(), session_id.clone());
        session_id
    }

    /// Clear every session; client registrations are unaffected
    pub fn reset_all(&self) {
        debug!("All sessions cleared");
        self.sessions.clear();
    }

    /// Remove the session for a URL
    pub fn remove(&self, url: &str) -> Option<String> {
        self.sessions.remove(url).map(|(_, session_id)| session_id)
    }

    /// Whether a URL has an active session
    pub fn contains(&self, url: &str) -> bool {
        self.sessions.contains_key(url)
    }

    /// Number of active sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_stable_across_lookups() {
        let registry = SessionRegistry::new();
        let first = registry.get_or_create("http://host/a");
        let second = registry.get_or_create("http://host/a");
        assert_eq!(first, second);
    }

    #[test]
    fn test_reset_replaces_identifier() {
        let registry = SessionRegistry::new();
        let original = registry.get_or_create("http://host/a");
        let reset = registry.reset("http://host/a");
        assert_ne!(original, reset);
        assert_eq!(registry.get_or_create("http://host/a"), reset);
    }

    #[test]
    fn test_reset_leaves_other_urls_untouched() {
        let registry = SessionRegistry::new();
        let a = registry.get_or_create("http://host/a");
        let b = registry.get_or_create("http://host/b");
        registry.reset("http://host/a");
        assert_ne!(registry.get_or_create("http://host/a"), a);
        assert_eq!(registry.get_or_create("http://host/b"), b);
    }

    #[test]
    fn test_reset_all_clears_everything() {
        let registry = SessionRegistry::new();
        registry.get_or_create("http://host/a");
        registry.get_or_create("http://host/b");
        registry.reset_all();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_single_url() {
        let registry = SessionRegistry::new();
        registry.get_or_create("http://host/a");
        registry.get_or_create("http://host/b");
        registry.remove("http://host/a");
        assert!(!registry.contains("http://host/a"));
        assert!(registry.contains("http://host/b"));
    }
}
