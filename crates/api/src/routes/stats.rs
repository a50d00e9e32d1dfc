//! Statistics endpoint handler.

use std::time::Instant;

use analytics_core::aggregate;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use report::Dashboard;
use serde::Deserialize;
use telemetry::metrics;
use tracing::info;

use crate::response::ApiError;
use crate::state::AppState;

/// Default lookback when the caller gives no window.
const DEFAULT_WINDOW_DAYS: i64 = 30;

/// GET /stats query parameters. Both bounds optional; the window is
/// `[from, to)`.
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// GET /stats - Aggregated dashboard statistics for a window.
pub async fn stats_handler(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Dashboard>, ApiError> {
    let to = query.to.unwrap_or_else(Utc::now);
    let from = query.from.unwrap_or(to - Duration::days(DEFAULT_WINDOW_DAYS));

    if from >= to {
        return Err(ApiError::bad_request("window start must precede its end"));
    }

    let events = state.store.page_views_between(from, to).await?;

    let started = Instant::now();
    let report = aggregate(from, to, &events);
    metrics()
        .aggregate_latency
        .observe(started.elapsed().as_millis() as u64);
    metrics().reports_generated.inc();

    info!(
        from = %from,
        to = %to,
        events = events.len(),
        total_visits = report.total_visits,
        "Generated dashboard report"
    );

    Ok(Json(Dashboard::from_report(&report)))
}
