//! Daily digest scheduler.
//!
//! Once per day, aggregates the previous UTC day's page views, renders the
//! HTML digest with any unread contact messages, and hands it to the
//! configured sender. Each wakeup produces at most one dispatch.

use std::sync::Arc;
use std::time::Instant;

use analytics_core::{aggregate, Error, Result};
use chrono::{DateTime, Days, NaiveTime, Utc};
use event_store::EventStore;
use report::{render_digest, DigestSender, DIGEST_MESSAGE_LIMIT};
use telemetry::metrics;
use tracing::{error, info, warn};

/// The previous full UTC day relative to `now`, as a `[start, end)` window.
pub fn previous_day_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let start = end - Days::new(1);
    (start, end)
}

/// Time until the next occurrence of `hour_utc:00`, strictly in the future.
pub fn until_next_run(now: DateTime<Utc>, hour_utc: u32) -> std::time::Duration {
    let hour = hour_utc.min(23);
    let mut next = now
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc()
        + chrono::Duration::hours(hour as i64);
    if next <= now {
        next += chrono::Duration::days(1);
    }
    (next - now).to_std().unwrap_or_default()
}

/// Dispatches the daily digest at a fixed UTC hour.
pub struct DigestScheduler {
    store: Arc<dyn EventStore>,
    sender: Arc<dyn DigestSender>,
    hour_utc: u32,
}

impl DigestScheduler {
    pub fn new(store: Arc<dyn EventStore>, sender: Arc<dyn DigestSender>, hour_utc: u32) -> Self {
        Self {
            store,
            sender,
            hour_utc,
        }
    }

    /// Spawns the scheduler loop. Runs until the process exits.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(hour_utc = self.hour_utc, "Digest scheduler started");
            loop {
                let wait = until_next_run(Utc::now(), self.hour_utc);
                tokio::time::sleep(wait).await;

                if let Err(e) = self.run_once(Utc::now()).await {
                    metrics().digest_errors.inc();
                    error!(error = %e, "digest dispatch failed");
                }
            }
        })
    }

    /// Aggregates the previous day and sends one digest.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<()> {
        let (start, end) = previous_day_window(now);

        let events = self
            .store
            .page_views_between(start, end)
            .await
            .map_err(|e| Error::store(format!("digest event fetch failed: {e}")))?;

        let started = Instant::now();
        let report = aggregate(start, end, &events);
        metrics()
            .aggregate_latency
            .observe(started.elapsed().as_millis() as u64);
        metrics().reports_generated.inc();

        // Missing messages degrade the digest, they do not block it.
        let unread = match self.store.unread_messages(DIGEST_MESSAGE_LIMIT).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(error = %e, "unread message fetch failed, digest goes out without them");
                Vec::new()
            }
        };

        let digest = render_digest(&report, &unread);
        self.sender.send(&digest).await?;

        metrics().digests_sent.inc();
        info!(
            window_start = %start,
            total_visits = report.total_visits,
            unread = unread.len(),
            "Digest sent"
        );
        Ok(())
    }
}
