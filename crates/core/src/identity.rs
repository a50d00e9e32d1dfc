//! Visitor and session identity resolution.
//!
//! Identity lives in the caller's storage (browser localStorage in the site
//! SDK, request-scoped slots in the HTTP API). The resolver only sees the
//! [`IdentityStore`] abstraction, so tests substitute an in-memory store.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Session inactivity threshold (30 minutes).
pub const SESSION_TIMEOUT_MINUTES: i64 = 30;

/// Long-lived slot holding the visitor token.
pub const VISITOR_ID_KEY: &str = "visitor_id";
/// Short-lived slot holding the session token.
pub const SESSION_ID_KEY: &str = "session_id";
/// Short-lived slot holding the session start, write-once per session.
pub const SESSION_STARTED_KEY: &str = "session_started_at";
/// Short-lived slot holding the last qualifying page view.
pub const LAST_ACTIVITY_KEY: &str = "last_activity_at";

/// Key-value storage backing the identity slots.
///
/// Implementations are free to lose data; the resolver degrades to a fresh
/// identity whenever a slot is missing or unparsable. Analytics is
/// best-effort, not authoritative.
pub trait IdentityStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn clear(&mut self, key: &str);
}

/// In-memory identity store.
#[derive(Debug, Default, Clone)]
pub struct MemoryIdentityStore {
    slots: HashMap<String, String>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.slots.insert(key.to_string(), value.to_string());
    }

    fn clear(&mut self, key: &str) {
        self.slots.remove(key);
    }
}

/// Identity attached to one page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub visitor_id: Uuid,
    pub session_id: Uuid,
    /// Start of the current (unexpired) session run.
    pub session_started_at: DateTime<Utc>,
}

impl ResolvedIdentity {
    /// Elapsed session time at record time, in seconds.
    pub fn session_duration_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.session_started_at).num_seconds().max(0)
    }
}

/// Resolves the visitor token and the current session from a store.
pub struct IdentityResolver;

impl IdentityResolver {
    /// Resolves the full identity for a page view happening at `now`.
    ///
    /// Rewrites the last-activity slot as a side effect, so two calls within
    /// the timeout share a session and a later call mints a new one.
    pub fn resolve(store: &mut dyn IdentityStore, now: DateTime<Utc>) -> ResolvedIdentity {
        let visitor_id = Self::resolve_visitor_id(store);
        let (session_id, session_started_at) = Self::resolve_session(store, now);

        ResolvedIdentity {
            visitor_id,
            session_id,
            session_started_at,
        }
    }

    /// Reads the persisted visitor token, minting and persisting a fresh one
    /// when absent or unparsable. Idempotent for a stable store.
    pub fn resolve_visitor_id(store: &mut dyn IdentityStore) -> Uuid {
        if let Some(id) = store.get(VISITOR_ID_KEY).and_then(|v| v.parse().ok()) {
            return id;
        }

        let id = Uuid::new_v4();
        store.set(VISITOR_ID_KEY, &id.to_string());
        id
    }

    /// Returns the current session id and its start time.
    ///
    /// A session is superseded when the last-activity slot is unset or older
    /// than [`SESSION_TIMEOUT_MINUTES`]. The start slot is written once per
    /// session id; last-activity is always rewritten to `now`.
    pub fn resolve_session(
        store: &mut dyn IdentityStore,
        now: DateTime<Utc>,
    ) -> (Uuid, DateTime<Utc>) {
        let last_activity: Option<DateTime<Utc>> = store
            .get(LAST_ACTIVITY_KEY)
            .and_then(|v| v.parse().ok());

        let expired = match last_activity {
            Some(t) => now - t > Duration::minutes(SESSION_TIMEOUT_MINUTES),
            None => true,
        };

        let existing: Option<(Uuid, DateTime<Utc>)> = match (
            store.get(SESSION_ID_KEY).and_then(|v| v.parse().ok()),
            store.get(SESSION_STARTED_KEY).and_then(|v| v.parse().ok()),
        ) {
            (Some(id), Some(started)) => Some((id, started)),
            _ => None,
        };

        let (session_id, started_at) = match existing {
            Some(current) if !expired => current,
            _ => {
                let id = Uuid::new_v4();
                store.set(SESSION_ID_KEY, &id.to_string());
                store.set(SESSION_STARTED_KEY, &now.to_rfc3339());
                (id, now)
            }
        };

        store.set(LAST_ACTIVITY_KEY, &now.to_rfc3339());

        (session_id, started_at)
    }
}
