//! Mock implementations of the service's external seams.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use analytics_core::{ContactMessage, Error, Location, PageViewEvent, Result, SessionRow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use event_store::EventStore;
use geo_resolver::LocationResolver;
use parking_lot::Mutex;
use report::{Digest, DigestSender};

/// In-memory event store capturing every write.
#[derive(Default)]
pub struct MockEventStore {
    pub sessions: Mutex<Vec<SessionRow>>,
    pub events: Mutex<Vec<PageViewEvent>>,
    pub messages: Mutex<Vec<ContactMessage>>,
    fail_writes: AtomicBool,
}

impl MockEventStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }

    pub fn seed_events(&self, events: Vec<PageViewEvent>) {
        self.events.lock().extend(events);
    }

    pub fn seed_messages(&self, messages: Vec<ContactMessage>) {
        self.messages.lock().extend(messages);
    }
}

#[async_trait]
impl EventStore for MockEventStore {
    async fn upsert_session(&self, session: &SessionRow) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::store("mock store down"));
        }
        let mut sessions = self.sessions.lock();
        // Insert-or-ignore on the session key, like the real backend.
        if !sessions.iter().any(|s| s.session_id == session.session_id) {
            sessions.push(session.clone());
        }
        Ok(())
    }

    async fn insert_page_view(&self, event: &PageViewEvent) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::store("mock store down"));
        }
        self.events.lock().push(event.clone());
        Ok(())
    }

    async fn page_views_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PageViewEvent>> {
        Ok(self
            .events
            .lock()
            .iter()
            .filter(|e| e.created_at >= start && e.created_at < end)
            .cloned()
            .collect())
    }

    async fn unread_messages(&self, limit: usize) -> Result<Vec<ContactMessage>> {
        Ok(self
            .messages
            .lock()
            .iter()
            .filter(|m| !m.read)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Location resolver returning a fixed answer.
pub struct MockLocationResolver(pub Option<Location>);

#[async_trait]
impl LocationResolver for MockLocationResolver {
    async fn resolve(&self, _client_ip: Option<&str>) -> Option<Location> {
        self.0.clone()
    }
}

/// Digest sender capturing every dispatch.
#[derive(Default)]
pub struct MockDigestSender {
    pub sent: Mutex<Vec<Digest>>,
}

#[async_trait]
impl DigestSender for MockDigestSender {
    async fn send(&self, digest: &Digest) -> Result<()> {
        self.sent.lock().push(digest.clone());
        Ok(())
    }
}
