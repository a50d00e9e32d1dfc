//! Best-of-two-providers location resolution.

use std::sync::Arc;
use std::time::Duration;

use analytics_core::Location;
use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::GeoConfig;
use crate::provider::{IpApiProvider, IpapiCoProvider, LocationProvider};

/// Resolves the location for a page view. Failure yields `None`, never an
/// error; absence of a location must not block recording the view.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self, client_ip: Option<&str>) -> Option<Location>;
}

/// Races the given providers for `ip` and returns the earliest success.
///
/// A provider error just removes it from the race; the slower result is
/// discarded without a cancellation signal (it is simply never awaited
/// again). Returns `None` when every provider fails or `timeout` elapses.
pub async fn first_success(
    providers: &[Arc<dyn LocationProvider>],
    ip: &str,
    timeout: Duration,
) -> Option<Location> {
    let mut in_flight = JoinSet::new();
    for provider in providers {
        let provider = provider.clone();
        let ip = ip.to_string();
        in_flight.spawn(async move {
            let result = provider.lookup(&ip).await;
            (provider.name(), result)
        });
    }

    let race = async {
        while let Some(joined) = in_flight.join_next().await {
            match joined {
                Ok((name, Ok(location))) => {
                    debug!(provider = name, "geolocation race won");
                    return Some(location);
                }
                Ok((name, Err(e))) => {
                    debug!(provider = name, error = %e, "provider dropped from race");
                }
                Err(e) => {
                    warn!(error = %e, "provider task failed");
                }
            }
        }
        None
    };

    tokio::time::timeout(timeout, race).await.unwrap_or(None)
}

#[derive(Debug, Deserialize)]
struct IpEchoPayload {
    ip: String,
}

/// Production resolver: IP echo, then the provider race, with a per-IP
/// result cache so repeat views from one visitor skip the lookup entirely.
pub struct GeoResolver {
    http: reqwest::Client,
    config: GeoConfig,
    providers: Vec<Arc<dyn LocationProvider>>,
    cache: Cache<String, Location>,
}

impl GeoResolver {
    pub fn new(config: GeoConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let providers: Vec<Arc<dyn LocationProvider>> = vec![
            Arc::new(IpApiProvider::new(timeout)),
            Arc::new(IpapiCoProvider::new(timeout)),
        ];
        Self::with_providers(config, providers)
    }

    /// Build a resolver over custom providers (used by tests).
    pub fn with_providers(config: GeoConfig, providers: Vec<Arc<dyn LocationProvider>>) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();

        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            config,
            providers,
            cache,
        }
    }

    /// Fetches the caller's public IP from the echo service.
    async fn fetch_public_ip(&self) -> Option<String> {
        let response = match self.http.get(&self.config.ip_echo_url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                debug!(status = %r.status(), "ip echo returned error status");
                return None;
            }
            Err(e) => {
                debug!(error = %e, "ip echo request failed");
                return None;
            }
        };

        match response.json::<IpEchoPayload>().await {
            Ok(payload) => Some(payload.ip),
            Err(e) => {
                debug!(error = %e, "invalid ip echo response");
                None
            }
        }
    }
}

#[async_trait]
impl LocationResolver for GeoResolver {
    async fn resolve(&self, client_ip: Option<&str>) -> Option<Location> {
        let ip = match client_ip {
            Some(ip) => ip.to_string(),
            None => self.fetch_public_ip().await?,
        };

        if let Some(cached) = self.cache.get(&ip).await {
            debug!(ip = %ip, "geolocation cache hit");
            return Some(cached);
        }

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let location = first_success(&self.providers, &ip, timeout).await?;

        // Only successes are cached; a transient failure should not pin
        // "unknown" for the whole TTL.
        self.cache.insert(ip, location.clone()).await;

        Some(location)
    }
}
