//! Durable store access for the visit analytics pipeline.
//!
//! [`EventStore`] is the seam between the recorder/aggregator and the
//! hosted backend; tests substitute an in-memory implementation.

pub mod client;
pub mod config;

use analytics_core::{ContactMessage, PageViewEvent, Result, SessionRow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use client::{RestStoreClient, CONTACT_MESSAGES_TABLE, SESSIONS_TABLE, STATS_TABLE};
pub use config::StoreConfig;

/// Access to the durable tables behind the analytics pipeline.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Upsert a session row keyed by session id. Insert-or-ignore:
    /// `first_seen` is write-once.
    async fn upsert_session(&self, session: &SessionRow) -> Result<()>;

    /// Append one immutable page-view fact.
    async fn insert_page_view(&self, event: &PageViewEvent) -> Result<()>;

    /// Page views with `created_at` in `[start, end)`, ordered by creation
    /// time.
    async fn page_views_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PageViewEvent>>;

    /// Oldest unread contact messages, up to `limit`.
    async fn unread_messages(&self, limit: usize) -> Result<Vec<ContactMessage>>;
}
