//! In-process metrics for the analytics service.
//!
//! Counters accumulate in memory and are exposed through snapshots on the
//! health endpoint and in periodic log lines. There is no external metrics
//! backend; the festival site does not warrant one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Latency accumulator tracking count and sum, reported as a mean.
#[derive(Debug, Default)]
pub struct LatencyStat {
    sum_ms: AtomicU64,
    count: AtomicU64,
}

impl LatencyStat {
    pub fn observe(&self, ms: u64) {
        self.sum_ms.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn mean_ms(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum_ms.load(Ordering::Relaxed) as f64 / count as f64
        }
    }
}

/// Collected metrics for the tracking and reporting paths.
#[derive(Debug, Default)]
pub struct Metrics {
    // Tracking path
    pub track_requests: Counter,
    pub page_views_recorded: Counter,
    pub bot_views_discarded: Counter,
    pub geo_misses: Counter,
    pub store_write_errors: Counter,

    // Reporting path
    pub reports_generated: Counter,
    pub digests_sent: Counter,
    pub digest_errors: Counter,

    // Latencies
    pub track_latency: LatencyStat,
    pub aggregate_latency: LatencyStat,
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub track_requests: u64,
    pub page_views_recorded: u64,
    pub bot_views_discarded: u64,
    pub geo_misses: u64,
    pub store_write_errors: u64,
    pub reports_generated: u64,
    pub digests_sent: u64,
    pub digest_errors: u64,
    pub track_latency_mean_ms: f64,
    pub aggregate_latency_mean_ms: f64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            track_requests: self.track_requests.get(),
            page_views_recorded: self.page_views_recorded.get(),
            bot_views_discarded: self.bot_views_discarded.get(),
            geo_misses: self.geo_misses.get(),
            store_write_errors: self.store_write_errors.get(),
            reports_generated: self.reports_generated.get(),
            digests_sent: self.digests_sent.get(),
            digest_errors: self.digest_errors.get(),
            track_latency_mean_ms: self.track_latency.mean_ms(),
            aggregate_latency_mean_ms: self.aggregate_latency.mean_ms(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_mean_guards_empty() {
        let stat = LatencyStat::default();
        assert_eq!(stat.mean_ms(), 0.0);

        stat.observe(10);
        stat.observe(30);
        assert_eq!(stat.mean_ms(), 20.0);
    }

    #[test]
    fn snapshot_reflects_counters() {
        let metrics = Metrics::new();
        metrics.page_views_recorded.inc_by(3);
        metrics.bot_views_discarded.inc();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.page_views_recorded, 3);
        assert_eq!(snapshot.bot_views_discarded, 1);
    }
}
