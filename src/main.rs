//! Festival visit-analytics service
//!
//! Small HTTP service behind the festival website handling:
//! - Page-view tracking with visitor/session identity and bot filtering
//! - Best-effort IP geolocation over two racing providers
//! - Dashboard statistics aggregated from the row store
//! - A daily HTML digest of visits and unread contact messages

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use api::{router, AppState};
use event_store::{RestStoreClient, StoreConfig};
use geo_resolver::{GeoConfig, GeoResolver};
use report::{DigestSender, LogSender, WebhookSender};
use telemetry::{health, init_tracing_from_env};
use tracker::{DigestScheduler, PageViewTracker};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    #[serde(default)]
    store: StoreConfig,

    #[serde(default)]
    geo: GeoConfig,

    #[serde(default)]
    digest: DigestConfig,
}

/// Daily digest configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct DigestConfig {
    #[serde(default = "default_digest_enabled")]
    enabled: bool,
    /// UTC hour of the daily dispatch.
    #[serde(default = "default_digest_hour")]
    hour_utc: u32,
    /// Mail-relay webhook. When unset the digest only goes to the log.
    #[serde(default)]
    webhook_url: Option<String>,
    #[serde(default = "default_digest_recipient")]
    recipient: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_digest_enabled() -> bool {
    true
}

fn default_digest_hour() -> u32 {
    7
}

fn default_digest_recipient() -> String {
    "contact@festival.example".to_string()
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            enabled: default_digest_enabled(),
            hour_utc: default_digest_hour(),
            webhook_url: None,
            recipient: default_digest_recipient(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store: StoreConfig::default(),
            geo: GeoConfig::default(),
            digest: DigestConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!(
        "Starting festival analytics service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = load_config()?;

    let store = Arc::new(
        RestStoreClient::new(config.store.clone()).context("Failed to create store client")?,
    );
    let geo = Arc::new(GeoResolver::new(config.geo.clone()));

    check_health(&store).await;

    let tracker = Arc::new(PageViewTracker::new(store.clone(), geo.clone()));

    // Digest scheduler runs for the life of the process.
    if config.digest.enabled {
        let sender: Arc<dyn DigestSender> = match &config.digest.webhook_url {
            Some(url) => Arc::new(WebhookSender::new(
                reqwest::Client::new(),
                url.clone(),
                config.digest.recipient.clone(),
            )),
            None => Arc::new(LogSender),
        };
        let scheduler = DigestScheduler::new(store.clone(), sender, config.digest.hour_utc);
        let _digest_handle = scheduler.spawn();
    } else {
        info!("Digest scheduler disabled by configuration");
    }

    let state = AppState::new(tracker, store.clone());
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("FESTIVAL")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested config from environment; the config
    // crate's nested parsing does not handle underscored field names well.
    if let Ok(url) = std::env::var("FESTIVAL_STORE_URL") {
        config.store.url = url;
    }
    if let Ok(api_key) = std::env::var("FESTIVAL_STORE_API_KEY") {
        config.store.api_key = Some(api_key);
    }
    if let Ok(url) = std::env::var("FESTIVAL_DIGEST_WEBHOOK_URL") {
        config.digest.webhook_url = Some(url);
    }
    if let Ok(recipient) = std::env::var("FESTIVAL_DIGEST_RECIPIENT") {
        config.digest.recipient = recipient;
    }

    Ok(config)
}

/// Check component health on startup.
async fn check_health(store: &RestStoreClient) {
    if store.check_connection().await {
        health().store.set_healthy();
        info!("Row store connection: healthy");
    } else {
        health().store.set_unhealthy("Connection failed");
        error!("Row store connection: unhealthy");
    }

    // Geolocation is best-effort; mark it healthy until a lookup says
    // otherwise so a cold start does not report degraded.
    health().geo.set_healthy();
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
