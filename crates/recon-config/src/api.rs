//! Backend API configuration.

use serde::{Deserialize, Serialize};

/// Default locally routed base (dev proxy in front of the backend).
fn default_local_base_url() -> String {
    String::from("http://localhost:5173/api")
}

const fn default_request_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    String::from("recon/0.1")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Absolute backend base URL (e.g., `https://api.example.org/api`).
    #[serde(default)]
    pub base_url: String,

    /// Base that relative paths are routed through (local proxy).
    #[serde(default = "default_local_base_url")]
    pub local_base_url: String,

    /// Bearer token. Empty means requests go out unauthenticated.
    #[serde(default)]
    pub token: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            local_base_url: default_local_base_url(),
            token: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    /// Check if the API config has the minimum required fields.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }

    /// Token to send, if one is configured.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        let token = self.token.trim();
        (!token.is_empty()).then_some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = ApiConfig::default();
        assert!(!config.is_configured());
        assert!(config.token().is_none());
        assert_eq!(config.local_base_url, "http://localhost:5173/api");
    }

    #[test]
    fn blank_token_is_absent() {
        let config = ApiConfig {
            token: "   ".into(),
            ..Default::default()
        };
        assert!(config.token().is_none());
    }

    #[test]
    fn configured_with_base_url() {
        let config = ApiConfig {
            base_url: "https://api.example.org/api".into(),
            token: "abc".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert_eq!(config.token(), Some("abc"));
    }
}
