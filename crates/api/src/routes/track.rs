//! Tracking endpoint handler.

use axum::{extract::State, Json};
use analytics_core::IdentityResolver;
use chrono::Utc;
use serde::Deserialize;
use telemetry::metrics;
use tracing::debug;
use validator::Validate;

use crate::extractors::{ClientIp, UserAgent};
use crate::response::{ApiError, IdentitySlots, TrackResponse};
use crate::state::AppState;
use tracker::TrackInput;

/// POST /track request body.
#[derive(Debug, Deserialize, Validate)]
pub struct TrackRequest {
    /// Raw page identifier (e.g. "/programme").
    #[validate(length(min = 1, max = 200))]
    pub page: String,
    #[validate(length(max = 2048))]
    #[serde(default)]
    pub referrer: Option<String>,
    /// Identity slots as currently persisted by the site.
    #[serde(default)]
    pub identity: IdentitySlots,
}

/// POST /track - Records one page view.
///
/// Identity resolution runs synchronously so the rewritten slots go back in
/// the response; the rest of the pipeline (bot gate, geolocation, store
/// writes) is spawned and never blocks or fails the call.
pub async fn track_handler(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    UserAgent(user_agent): UserAgent,
    Json(request): Json<TrackRequest>,
) -> Result<Json<TrackResponse>, ApiError> {
    metrics().track_requests.inc();

    request.validate().map_err(|e| {
        ApiError::validation(
            e.field_errors()
                .into_iter()
                .map(|(field, errors)| format!("{field}: {} error(s)", errors.len()))
                .collect(),
        )
    })?;

    let mut slots = request.identity;
    let identity = IdentityResolver::resolve(&mut slots, Utc::now());

    debug!(
        page = %request.page,
        visitor_id = %identity.visitor_id,
        session_id = %identity.session_id,
        "Accepted page view"
    );

    let tracker = state.tracker.clone();
    let input = TrackInput {
        page: request.page,
        referrer: request.referrer,
        user_agent,
        client_ip,
    };
    tokio::spawn(async move {
        tracker.record(input, identity).await;
    });

    Ok(Json(TrackResponse::accepted(slots)))
}
