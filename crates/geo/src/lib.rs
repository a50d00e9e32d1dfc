//! Best-effort IP geolocation for the visit analytics pipeline.

pub mod config;
pub mod provider;
pub mod resolver;

pub use config::GeoConfig;
pub use provider::{IpApiProvider, IpapiCoProvider, LocationProvider};
pub use resolver::{first_success, GeoResolver, LocationResolver};
