//! Geolocation providers.
//!
//! Two independent free services with differing JSON field names, both
//! normalized into [`Location`]. Neither requires authentication.

use std::time::Duration;

use analytics_core::{Error, Location, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// A single IP-to-location lookup service.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Resolves `ip` to a location. Errors cover non-OK statuses and
    /// provider-side rejections; timeouts are enforced by the caller's race.
    async fn lookup(&self, ip: &str) -> Result<Location>;
}

/// ip-api.com payload: `country` / `regionName` / `lat` / `lon`, plus a
/// `status` discriminator instead of an HTTP error.
#[derive(Debug, Deserialize)]
pub(crate) struct IpApiPayload {
    pub status: String,
    pub country: Option<String>,
    #[serde(rename = "regionName")]
    pub region_name: Option<String>,
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl IpApiPayload {
    pub(crate) fn into_location(self) -> Result<Location> {
        if self.status != "success" {
            return Err(Error::provider(format!("ip-api status: {}", self.status)));
        }
        Ok(Location {
            country: self.country,
            region: self.region_name,
            city: self.city,
            latitude: self.lat,
            longitude: self.lon,
        })
    }
}

/// ip-api.com client.
pub struct IpApiProvider {
    http: reqwest::Client,
    base_url: String,
}

impl IpApiProvider {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url("http://ip-api.com", timeout)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: http_client(timeout),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl LocationProvider for IpApiProvider {
    fn name(&self) -> &'static str {
        "ip-api"
    }

    async fn lookup(&self, ip: &str) -> Result<Location> {
        let url = format!("{}/json/{}", self.base_url, ip);
        debug!(url = %url, "ip-api lookup");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::provider(format!("ip-api request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::provider(format!(
                "ip-api returned {}",
                response.status()
            )));
        }

        let payload: IpApiPayload = response
            .json()
            .await
            .map_err(|e| Error::provider(format!("invalid ip-api response: {e}")))?;

        payload.into_location()
    }
}

/// ipapi.co payload: `country_name` / `region` / `latitude` / `longitude`,
/// with an `error` flag on rejected lookups.
#[derive(Debug, Deserialize)]
pub(crate) struct IpapiCoPayload {
    #[serde(default)]
    pub error: bool,
    pub reason: Option<String>,
    pub country_name: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl IpapiCoPayload {
    pub(crate) fn into_location(self) -> Result<Location> {
        if self.error {
            return Err(Error::provider(format!(
                "ipapi.co rejected lookup: {}",
                self.reason.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(Location {
            country: self.country_name,
            region: self.region,
            city: self.city,
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

/// ipapi.co client.
pub struct IpapiCoProvider {
    http: reqwest::Client,
    base_url: String,
}

impl IpapiCoProvider {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url("https://ipapi.co", timeout)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: http_client(timeout),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl LocationProvider for IpapiCoProvider {
    fn name(&self) -> &'static str {
        "ipapi.co"
    }

    async fn lookup(&self, ip: &str) -> Result<Location> {
        let url = format!("{}/{}/json/", self.base_url, ip);
        debug!(url = %url, "ipapi.co lookup");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::provider(format!("ipapi.co request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::provider(format!(
                "ipapi.co returned {}",
                response.status()
            )));
        }

        let payload: IpapiCoPayload = response
            .json()
            .await
            .map_err(|e| Error::provider(format!("invalid ipapi.co response: {e}")))?;

        payload.into_location()
    }
}

fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}
