//! Standardized API responses.

use analytics_core::identity::{
    IdentityStore, LAST_ACTIVITY_KEY, SESSION_ID_KEY, SESSION_STARTED_KEY, VISITOR_ID_KEY,
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use telemetry::MetricsSnapshot;

/// Identity slots echoed between the site and the service.
///
/// The browser remains the backing storage: it sends whatever slots it has,
/// the resolver rewrites them, and the updated slots travel back in the
/// response for the site to persist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentitySlots {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<String>,
}

impl IdentityStore for IdentitySlots {
    fn get(&self, key: &str) -> Option<String> {
        match key {
            VISITOR_ID_KEY => self.visitor_id.clone(),
            SESSION_ID_KEY => self.session_id.clone(),
            SESSION_STARTED_KEY => self.session_started_at.clone(),
            LAST_ACTIVITY_KEY => self.last_activity_at.clone(),
            _ => None,
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        let slot = match key {
            VISITOR_ID_KEY => &mut self.visitor_id,
            SESSION_ID_KEY => &mut self.session_id,
            SESSION_STARTED_KEY => &mut self.session_started_at,
            LAST_ACTIVITY_KEY => &mut self.last_activity_at,
            _ => return,
        };
        *slot = Some(value.to_string());
    }

    fn clear(&mut self, key: &str) {
        let slot = match key {
            VISITOR_ID_KEY => &mut self.visitor_id,
            SESSION_ID_KEY => &mut self.session_id,
            SESSION_STARTED_KEY => &mut self.session_started_at,
            LAST_ACTIVITY_KEY => &mut self.last_activity_at,
            _ => return,
        };
        *slot = None;
    }
}

/// Response to a track call: always success, with the rewritten slots.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrackResponse {
    pub success: bool,
    pub identity: IdentitySlots,
}

impl TrackResponse {
    pub fn accepted(identity: IdentitySlots) -> Self {
        Self {
            success: true,
            identity,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub store_connected: bool,
    pub geo_connected: bool,
    pub metrics: MetricsSnapshot,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// API error type.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse {
                error: msg.into(),
                details: None,
            },
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn validation(details: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            response: ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(details),
            },
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<analytics_core::Error> for ApiError {
    fn from(err: analytics_core::Error) -> Self {
        match &err {
            analytics_core::Error::Validation(msg) => ApiError::bad_request(msg.clone()),
            analytics_core::Error::Store(msg) => ApiError::unavailable(msg.clone()),
            _ => ApiError::internal(err.to_string()),
        }
    }
}
