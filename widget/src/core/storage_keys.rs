//! Storage key derivation
//!
//! Keys are namespaced by a digest of the proxy URL so that widgets pointed
//! at different backends on the same origin never share a session.

use sha2::{Digest, Sha256};

const SESSION_KEY_PREFIX: &str = "ai_chat_widget_thread_";
const LOG_KEY_PREFIX: &str = "ai_chat_widget_log_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    namespace: String,
}

impl StorageKeys {
    pub fn for_api_url(api_url: &str) -> Self {
        let digest = format!("{:x}", Sha256::digest(api_url.as_bytes()));
        Self {
            namespace: digest[..16].to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Key holding the current session handle
    pub fn session(&self) -> String {
        format!("{SESSION_KEY_PREFIX}{}", self.namespace)
    }

    /// Key holding the conversation log of one session
    pub fn log(&self, session_id: &str) -> String {
        format!("{LOG_KEY_PREFIX}{}_{session_id}", self.namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_is_stable_and_short() {
        let keys = StorageKeys::for_api_url("http://localhost:3000");
        assert_eq!(keys.namespace().len(), 16);
        assert!(keys.namespace().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(keys, StorageKeys::for_api_url("http://localhost:3000"));
    }

    #[test]
    fn test_different_backends_do_not_collide() {
        let a = StorageKeys::for_api_url("https://a.example.com");
        let b = StorageKeys::for_api_url("https://b.example.com");
        assert_ne!(a.session(), b.session());
    }

    #[test]
    fn test_key_layout() {
        let keys = StorageKeys::for_api_url("http://localhost:3000");
        assert!(keys.session().starts_with("ai_chat_widget_thread_"));
        assert_eq!(
            keys.log("thread_1"),
            format!("ai_chat_widget_log_{}_thread_1", keys.namespace())
        );
    }
}
