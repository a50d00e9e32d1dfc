//! Record types for the visit analytics pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Resolved geographic location attached to a page view.
///
/// Every field is optional: the two upstream providers disagree on which
/// fields they populate, and the whole lookup is best-effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Device class derived from the client signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    /// "Mobile" anywhere in the signature classifies as mobile; everything
    /// else, including an empty signature, is desktop.
    pub fn from_signature(signature: &str) -> Self {
        if signature.contains("Mobile") {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
        }
    }
}

/// Session row persisted in the `sessions` table.
///
/// Upserted with insert-or-ignore semantics: `first_seen` is write-once, so
/// repeated page views within a session never move the start of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRow {
    pub session_id: Uuid,
    pub visitor_id: Uuid,
    pub first_seen: DateTime<Utc>,
}

/// Immutable page-view fact, one row in the `stats` table.
///
/// Created by the recorder on every qualifying navigation; never mutated or
/// deleted by this service. The aggregation engine only reads.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PageViewEvent {
    pub id: Uuid,
    /// Raw page identifier as sent by the site (e.g. "/programme").
    #[validate(length(max = 200))]
    pub page: String,
    /// Always 1 at creation. The schema allows pre-aggregated rows but the
    /// recorder never batches.
    pub view_count: u64,
    pub session_id: Uuid,
    pub visitor_id: Uuid,
    /// Raw client signature string.
    #[validate(length(max = 512))]
    pub user_agent: String,
    #[validate(length(max = 2048))]
    pub referrer: Option<String>,
    /// Elapsed session time at record time, in seconds.
    pub session_duration_secs: i64,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl PageViewEvent {
    /// Creates a single-view event with no location attached.
    pub fn new(
        page: impl Into<String>,
        session_id: Uuid,
        visitor_id: Uuid,
        user_agent: impl Into<String>,
        referrer: Option<String>,
        session_duration_secs: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            page: page.into(),
            view_count: 1,
            session_id,
            visitor_id,
            user_agent: user_agent.into(),
            referrer,
            session_duration_secs,
            country: None,
            region: None,
            city: None,
            latitude: None,
            longitude: None,
            created_at,
        }
    }

    /// Attaches a resolved location, if any. Absence is a normal case, not
    /// an error; the location fields simply stay empty.
    pub fn with_location(mut self, location: Option<Location>) -> Self {
        if let Some(loc) = location {
            self.country = loc.country;
            self.region = loc.region;
            self.city = loc.city;
            self.latitude = loc.latitude;
            self.longitude = loc.longitude;
        }
        self
    }

    pub fn device_class(&self) -> DeviceClass {
        DeviceClass::from_signature(&self.user_agent)
    }
}

/// Contact-form message, read by the digest renderer to surface unread
/// counts and excerpts. Created and flagged elsewhere; this service never
/// writes to `contact_messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
