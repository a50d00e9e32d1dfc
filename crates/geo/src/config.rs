//! Geolocation resolver configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the geolocation resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    /// IP-echo service returning the caller's public address.
    #[serde(default = "default_ip_echo_url")]
    pub ip_echo_url: String,

    /// Timeout applied to the IP echo step and to the provider race.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TTL for cached per-IP lookups.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum cached IPs.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

fn default_ip_echo_url() -> String {
    "https://api.ipify.org?format=json".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_cache_capacity() -> u64 {
    10_000
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            ip_echo_url: default_ip_echo_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
        }
    }
}
