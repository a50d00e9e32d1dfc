//! Row-store client configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the hosted row store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the row API (e.g. "https://backend.example.com").
    #[serde(default = "default_url")]
    pub url: String,

    /// Optional bearer token sent with every request.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}
