//! Page-view recording pipeline.
//!
//! Fire-and-forget: [`PageViewTracker::record`] never returns an error and
//! never panics. A failed geolocation lookup records the view without a
//! location; a failed store write drops the view. Analytics must never
//! take the site down with it.

use std::sync::Arc;
use std::time::Instant;

use analytics_core::{bots::is_bot, PageViewEvent, ResolvedIdentity, SessionRow};
use chrono::Utc;
use event_store::EventStore;
use geo_resolver::LocationResolver;
use telemetry::metrics;
use tracing::{debug, warn};

/// Raw inputs for one page view, as received from the site.
#[derive(Debug, Clone)]
pub struct TrackInput {
    pub page: String,
    pub referrer: Option<String>,
    pub user_agent: String,
    pub client_ip: Option<String>,
}

/// Records qualifying page views into the store.
pub struct PageViewTracker {
    store: Arc<dyn EventStore>,
    geo: Arc<dyn LocationResolver>,
}

impl PageViewTracker {
    pub fn new(store: Arc<dyn EventStore>, geo: Arc<dyn LocationResolver>) -> Self {
        Self { store, geo }
    }

    /// Runs the recording pipeline for one view: bot gate, geolocation,
    /// session upsert, event insert.
    ///
    /// Identity is resolved by the caller before this runs, so the response
    /// to the visitor never waits on this pipeline.
    pub async fn record(&self, input: TrackInput, identity: ResolvedIdentity) {
        let started = Instant::now();

        if is_bot(&input.user_agent) {
            metrics().bot_views_discarded.inc();
            debug!(user_agent = %input.user_agent, "discarded bot page view");
            return;
        }

        let now = Utc::now();
        let location = self.geo.resolve(input.client_ip.as_deref()).await;
        if location.is_none() {
            metrics().geo_misses.inc();
        }

        let session = SessionRow {
            session_id: identity.session_id,
            visitor_id: identity.visitor_id,
            first_seen: identity.session_started_at,
        };
        if let Err(e) = self.store.upsert_session(&session).await {
            warn!(session_id = %session.session_id, error = %e, "session upsert failed");
        }

        let event = PageViewEvent::new(
            input.page,
            identity.session_id,
            identity.visitor_id,
            input.user_agent,
            input.referrer,
            identity.session_duration_secs(now),
            now,
        )
        .with_location(location);

        match self.store.insert_page_view(&event).await {
            Ok(()) => {
                metrics().page_views_recorded.inc();
                debug!(page = %event.page, session_id = %event.session_id, "recorded page view");
            }
            Err(e) => {
                warn!(page = %event.page, error = %e, "page view insert failed");
            }
        }

        metrics().track_latency.observe(started.elapsed().as_millis() as u64);
    }
}
