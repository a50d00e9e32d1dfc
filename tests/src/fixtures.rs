//! Test data builders.

use analytics_core::{ContactMessage, Location, PageViewEvent};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

pub fn desktop_user_agent() -> &'static str {
    "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0"
}

pub fn mobile_user_agent() -> &'static str {
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148 Safari/604.1"
}

pub fn bot_user_agent() -> &'static str {
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)"
}

/// Track request body with no identity slots (a first visit).
pub fn track_body(page: &str) -> Value {
    json!({ "page": page })
}

/// Track request body carrying slots from a previous response.
pub fn track_body_with_identity(page: &str, identity: &Value) -> Value {
    json!({ "page": page, "identity": identity })
}

pub fn toulouse() -> Location {
    Location {
        country: Some("France".into()),
        region: Some("Occitanie".into()),
        city: Some("Toulouse".into()),
        latitude: Some(43.6),
        longitude: Some(1.44),
    }
}

/// Desktop page view at a fixed moment, without a location.
pub fn page_view(page: &str, created_at: DateTime<Utc>) -> PageViewEvent {
    PageViewEvent::new(
        page,
        Uuid::new_v4(),
        Uuid::new_v4(),
        desktop_user_agent(),
        None,
        0,
        created_at,
    )
}

pub fn unread_message(name: &str) -> ContactMessage {
    ContactMessage {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        body: "Bonjour, une question sur le programme.".to_string(),
        read: false,
        created_at: Utc::now(),
    }
}
