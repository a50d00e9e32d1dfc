//! REST client for the hosted row store.
//!
//! The backend exposes table-like collections over HTTP: insert a row,
//! upsert by key with insert-or-ignore semantics, and range-filtered
//! selects ordered by creation time. No other query shapes are needed.

use std::time::Duration;

use analytics_core::{ContactMessage, Error, PageViewEvent, Result, SessionRow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use telemetry::metrics;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::EventStore;

/// `sessions` table: one row per session, keyed by session id.
pub const SESSIONS_TABLE: &str = "sessions";
/// `stats` table: append-only page-view facts.
pub const STATS_TABLE: &str = "stats";
/// `contact_messages` table: read-only from this service.
pub const CONTACT_MESSAGES_TABLE: &str = "contact_messages";

/// Row-store client over the backend's table API.
#[derive(Clone)]
pub struct RestStoreClient {
    http: reqwest::Client,
    config: StoreConfig,
}

impl RestStoreClient {
    pub fn new(config: StoreConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("failed to build store client: {e}")))?;

        info!(url = %config.url, "Created row-store client");

        Ok(Self { http, config })
    }

    fn rows_url(&self, table: &str) -> String {
        format!("{}/tables/{}/rows", self.config.url, table)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn check_status(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Error::store(format!("{context}: {status} {body}")))
    }

    /// Pings the backend. Used for startup health checks only.
    pub async fn check_connection(&self) -> bool {
        let url = format!("{}/health", self.config.url);
        match self.request(self.http.get(&url)).send().await {
            Ok(r) => r.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl EventStore for RestStoreClient {
    /// Insert-or-ignore on the session key: the first page view of a session
    /// creates the row, later views leave `first_seen` untouched.
    async fn upsert_session(&self, session: &SessionRow) -> Result<()> {
        let url = format!(
            "{}/{}",
            self.rows_url(SESSIONS_TABLE),
            session.session_id
        );

        let response = self
            .request(self.http.put(&url).query(&[("on_conflict", "ignore")]))
            .json(session)
            .send()
            .await
            .map_err(|e| {
                metrics().store_write_errors.inc();
                Error::store(format!("session upsert failed: {e}"))
            })?;

        Self::check_status(response, "session upsert").await.map_err(|e| {
            metrics().store_write_errors.inc();
            e
        })?;

        debug!(session_id = %session.session_id, "Upserted session");
        Ok(())
    }

    async fn insert_page_view(&self, event: &PageViewEvent) -> Result<()> {
        let response = self
            .request(self.http.post(self.rows_url(STATS_TABLE)))
            .json(event)
            .send()
            .await
            .map_err(|e| {
                metrics().store_write_errors.inc();
                Error::store(format!("page view insert failed: {e}"))
            })?;

        Self::check_status(response, "page view insert").await.map_err(|e| {
            metrics().store_write_errors.inc();
            e
        })?;

        debug!(page = %event.page, session_id = %event.session_id, "Inserted page view");
        Ok(())
    }

    async fn page_views_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PageViewEvent>> {
        let response = self
            .request(self.http.get(self.rows_url(STATS_TABLE)).query(&[
                ("created_at_gte", start.to_rfc3339()),
                ("created_at_lt", end.to_rfc3339()),
                ("order", "created_at".to_string()),
            ]))
            .send()
            .await
            .map_err(|e| Error::store(format!("page view select failed: {e}")))?;

        let response = Self::check_status(response, "page view select").await?;

        response
            .json()
            .await
            .map_err(|e| Error::store(format!("invalid page view rows: {e}")))
    }

    async fn unread_messages(&self, limit: usize) -> Result<Vec<ContactMessage>> {
        let response = self
            .request(self.http.get(self.rows_url(CONTACT_MESSAGES_TABLE)).query(&[
                ("read", "false".to_string()),
                ("order", "created_at".to_string()),
                ("limit", limit.to_string()),
            ]))
            .send()
            .await
            .map_err(|e| Error::store(format!("message select failed: {e}")))?;

        let response = Self::check_status(response, "message select").await?;

        response
            .json()
            .await
            .map_err(|e| Error::store(format!("invalid message rows: {e}")))
    }
}
